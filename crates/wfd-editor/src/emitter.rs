//! Host notification channels.

use wfd_core::{DesignerError, Result};

/// Handle returned by [`EventEmitter::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A list of listeners called in registration order.
pub struct EventEmitter<T: ?Sized> {
    listeners: Vec<(ListenerId, Box<dyn FnMut(&T)>)>,
    next_id: u64,
}

impl<T: ?Sized> Default for EventEmitter<T> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T: ?Sized> EventEmitter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> Result<()> {
        let pos = self
            .listeners
            .iter()
            .position(|(l, _)| *l == id)
            .ok_or(DesignerError::ListenerNotFound(id.0))?;
        self.listeners.remove(pos);
        Ok(())
    }

    pub fn fire(&mut self, value: &T) {
        for (_, listener) in &mut self.listeners {
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn fires_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut e = EventEmitter::<str>::new();
        let l1 = Rc::clone(&log);
        e.add_listener(move |name| l1.borrow_mut().push(format!("1:{name}")));
        let l2 = Rc::clone(&log);
        e.add_listener(move |name| l2.borrow_mut().push(format!("2:{name}")));
        e.fire("task");
        assert_eq!(*log.borrow(), vec!["1:task".to_string(), "2:task".to_string()]);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let count = Rc::new(RefCell::new(0));
        let mut e = EventEmitter::<str>::new();
        let c = Rc::clone(&count);
        let id = e.add_listener(move |_| *c.borrow_mut() += 1);
        e.remove_listener(id).unwrap();
        e.fire("x");
        assert_eq!(*count.borrow(), 0);
        assert!(e.is_empty());
    }

    #[test]
    fn removing_unknown_listener_fails() {
        let mut e = EventEmitter::<str>::new();
        let id = e.add_listener(|_| {});
        e.remove_listener(id).unwrap();
        assert_eq!(
            e.remove_listener(id),
            Err(DesignerError::ListenerNotFound(id.raw()))
        );
    }
}
