use crate::{
    dom::Dom,
    event::{Event, EventResult},
    Error, NodeId, Options, Scrollable,
};

/// Central part of the overflow library.
///
/// Owns the page and every scrollable set up on it. The host forwards each
/// observed page event to [`Overflow::on_event`], and calls
/// [`Overflow::recalculate_all`] whenever the layout may have changed.
pub struct Overflow {
    dom: Box<dyn Dom>,
    options: Options,
    scrollables: Vec<Scrollable>,
}

impl Overflow {
    /// Sets up a scrollable for every node matching `selector` whose
    /// computed `overflow` is not `visible`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use overflow_core::{dom::puppet, Options, Overflow};
    ///
    /// let dom = puppet::Dom::new();
    /// let news = dom.add_element(dom.body(), "div");
    /// dom.add_class(news, "news");
    /// dom.set_sheet_style(news, "overflow", "auto");
    /// dom.set_size(news, 200.0, 100.0);
    /// dom.set_content_size(news, 200.0, 500.0);
    ///
    /// let overflow = Overflow::new(Box::new(dom), ".news", Options::default());
    /// assert_eq!(overflow.scrollables().len(), 1);
    /// ```
    pub fn new(dom: Box<dyn Dom>, selector: &str, options: Options) -> Self {
        let mut overflow = Overflow {
            dom,
            options,
            scrollables: Vec::new(),
        };
        overflow.discover(selector);
        overflow
    }

    /// Sets up a scrollable for each of the given content nodes.
    ///
    /// Fails without touching the page if one of them is not part of the
    /// document.
    pub fn with_elements<I>(dom: Box<dyn Dom>, elements: I, options: Options) -> Result<Self, Error>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let elements: Vec<NodeId> = elements.into_iter().collect();
        if let Some(&missing) = elements.iter().find(|&&node| !dom.is_connected(node)) {
            return Err(Error::ContentNotFound(missing));
        }

        let mut overflow = Overflow {
            dom,
            options,
            scrollables: Vec::new(),
        };
        for content in elements {
            overflow.add(content);
        }
        Ok(overflow)
    }

    /// Sets up scrollables for new nodes matching `selector`.
    ///
    /// Nodes already managed, and nodes with a visible overflow, are skipped.
    /// Returns the number of scrollables added.
    pub fn discover(&mut self, selector: &str) -> usize {
        let candidates = self.dom.query(selector);
        let mut added = 0;
        for content in candidates {
            if self.dom.computed_style(content, "overflow") == "visible" {
                log::debug!("Skipping {content}: overflow is visible.");
                continue;
            }
            if self.add(content) {
                added += 1;
            }
        }
        added
    }

    fn add(&mut self, content: NodeId) -> bool {
        if self.find(content).is_some() {
            return false;
        }
        let scrollable = Scrollable::new(&mut *self.dom, content, self.options.clone());
        self.scrollables.push(scrollable);
        true
    }

    fn find(&self, content: NodeId) -> Option<usize> {
        self.scrollables.iter().position(|s| s.content() == content)
    }

    /// Recomputes the geometry of every scrollable.
    ///
    /// Call this after anything that changes the size of a content, such as
    /// a window resize or new content.
    pub fn recalculate_all(&mut self) {
        for scrollable in &mut self.scrollables {
            scrollable.recompute_geometry(&mut *self.dom, false);
        }
    }

    /// Dispatches an event to every scrollable.
    ///
    /// Returns `EventResult::Consumed` if any of them used it.
    pub fn on_event(&mut self, event: Event) -> EventResult {
        let mut result = EventResult::Ignored;
        for scrollable in &mut self.scrollables {
            result = result.and(scrollable.on_event(&mut *self.dom, &event));
        }
        result
    }

    /// Runs a closure on the scrollable managing `content`.
    ///
    /// Returns `None` if no scrollable manages it.
    pub fn call_on<F, R>(&mut self, content: NodeId, callback: F) -> Option<R>
    where
        F: FnOnce(&mut Scrollable, &mut dyn Dom) -> R,
    {
        let index = self.find(content)?;
        Some(callback(&mut self.scrollables[index], &mut *self.dom))
    }

    /// Removes the scrollable managing `content`, restoring the page.
    ///
    /// Returns `false` if no scrollable manages it.
    pub fn remove(&mut self, content: NodeId) -> bool {
        match self.find(content) {
            Some(index) => {
                let scrollable = self.scrollables.remove(index);
                scrollable.teardown(&mut *self.dom);
                true
            }
            None => false,
        }
    }

    /// Returns the managed scrollables.
    pub fn scrollables(&self) -> &[Scrollable] {
        &self.scrollables
    }

    /// Returns the options given to new scrollables.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the page.
    pub fn dom(&self) -> &dyn Dom {
        &*self.dom
    }

    /// Returns the page, mutably.
    pub fn dom_mut(&mut self) -> &mut dyn Dom {
        &mut *self.dom
    }
}

impl Drop for Overflow {
    fn drop(&mut self) {
        for scrollable in &mut self.scrollables {
            scrollable.cancel_interactions(&mut *self.dom);
        }
    }
}
