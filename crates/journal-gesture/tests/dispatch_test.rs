#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Bubbling delivery of double activations through the element tree.

use std::cell::RefCell;
use std::rc::Rc;

use journal_gesture::dom::DoubleActivationListener;
use journal_gesture::{
    dispatch_pointer_release, Document, DoubleActivation, ElementId, GestureBridge,
    PointerRelease, Propagation,
};

type Seen = Rc<RefCell<Vec<(&'static str, ElementId)>>>;

fn recorder(seen: &Seen, label: &'static str, result: Propagation) -> DoubleActivationListener {
    let seen = Rc::clone(seen);
    Box::new(move |event: &DoubleActivation, _current: ElementId| {
        seen.borrow_mut().push((label, event.target));
        result
    })
}

struct Page {
    doc: Document,
    list: ElementId,
    entry: ElementId,
    leaf: ElementId,
}

fn page() -> Page {
    let mut doc = Document::new();
    let list = doc.append(doc.root(), "ul");
    let entry = doc.append(list, "li");
    let leaf = doc.append(entry, "em");
    Page {
        doc,
        list,
        entry,
        leaf,
    }
}

#[test]
fn single_release_dispatches_nothing() {
    let mut p = page();
    let seen: Seen = Rc::default();
    p.doc
        .on_double_activation(p.entry, recorder(&seen, "entry", Propagation::Continue));
    let mut bridge = GestureBridge::new(500);

    let out = dispatch_pointer_release(&mut bridge, &mut p.doc, PointerRelease::new(0, p.leaf));
    assert!(!out.default_prevented);
    assert!(out.double_activation.is_none());
    assert_eq!(out.dispatch.delivered, 0);
    assert!(seen.borrow().is_empty());
}

#[test]
fn double_activation_bubbles_from_target_to_root() {
    let mut p = page();
    let seen: Seen = Rc::default();
    let root = p.doc.root();
    p.doc
        .on_double_activation(root, recorder(&seen, "root", Propagation::Continue));
    p.doc
        .on_double_activation(p.list, recorder(&seen, "list", Propagation::Continue));
    p.doc
        .on_double_activation(p.entry, recorder(&seen, "entry-a", Propagation::Continue));
    p.doc
        .on_double_activation(p.entry, recorder(&seen, "entry-b", Propagation::Continue));
    let mut bridge = GestureBridge::new(500);

    dispatch_pointer_release(&mut bridge, &mut p.doc, PointerRelease::new(1_000, p.leaf));
    let out = dispatch_pointer_release(&mut bridge, &mut p.doc, PointerRelease::new(1_200, p.leaf));

    assert!(out.default_prevented);
    assert_eq!(out.dispatch.delivered, 4);
    assert_eq!(out.dispatch.stopped_at, None);
    let labels: Vec<&str> = seen.borrow().iter().map(|(l, _)| *l).collect();
    assert_eq!(labels, vec!["entry-a", "entry-b", "list", "root"]);
    assert!(seen.borrow().iter().all(|(_, target)| *target == p.leaf));
}

#[test]
fn stop_propagation_keeps_event_below_ancestors() {
    let mut p = page();
    let seen: Seen = Rc::default();
    p.doc
        .on_double_activation(p.list, recorder(&seen, "list", Propagation::Continue));
    p.doc
        .on_double_activation(p.entry, recorder(&seen, "entry", Propagation::Stop));
    let mut bridge = GestureBridge::new(500);

    dispatch_pointer_release(&mut bridge, &mut p.doc, PointerRelease::new(0, p.entry));
    let out = dispatch_pointer_release(&mut bridge, &mut p.doc, PointerRelease::new(100, p.entry));

    assert_eq!(out.dispatch.stopped_at, Some(p.entry));
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn detector_is_shared_across_elements() {
    let mut p = page();
    let seen: Seen = Rc::default();
    let root = p.doc.root();
    p.doc
        .on_double_activation(root, recorder(&seen, "root", Propagation::Continue));
    let mut bridge = GestureBridge::new(500);

    dispatch_pointer_release(&mut bridge, &mut p.doc, PointerRelease::new(0, p.list));
    let out = dispatch_pointer_release(&mut bridge, &mut p.doc, PointerRelease::new(50, p.leaf));

    // One detector for the whole page: the pair completes on the second target.
    assert_eq!(out.double_activation.unwrap().target, p.leaf);
    assert_eq!(seen.borrow().as_slice(), &[("root", p.leaf)]);
}

#[test]
fn disabled_bridge_never_dispatches() {
    let mut p = page();
    let seen: Seen = Rc::default();
    p.doc
        .on_double_activation(p.entry, recorder(&seen, "entry", Propagation::Continue));
    let mut bridge = GestureBridge::new(0);

    for t in [0, 10, 20, 30] {
        let out = dispatch_pointer_release(&mut bridge, &mut p.doc, PointerRelease::new(t, p.entry));
        assert!(!out.default_prevented);
    }
    assert!(seen.borrow().is_empty());
}
