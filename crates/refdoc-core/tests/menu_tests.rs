use std::cell::RefCell;
use std::rc::Rc;

use refdoc_core::model::ApiModel;
use refdoc_core::{MenuItemKind, RefdocOptions, ViewEvent};

const MUSEUM: &str = include_str!("fixtures/museum.yaml");

fn load() -> ApiModel {
    ApiModel::from_yaml(MUSEUM, RefdocOptions::default()).unwrap()
}

#[test]
fn absolute_indices_are_strictly_increasing_and_unique() {
    let api = load();
    let items = api.menu.items();
    assert!(!items.is_empty());

    for (expected, item) in items.iter().enumerate() {
        assert_eq!(item.absolute_idx, expected);
    }
}

#[test]
fn menu_order_is_groups_then_operations_then_sections() {
    let api = load();
    let summary: Vec<(MenuItemKind, &str, usize)> = api
        .menu
        .items()
        .iter()
        .map(|item| (item.kind, item.id.as_str(), item.depth))
        .collect();

    assert_eq!(
        summary,
        vec![
            (MenuItemKind::Group, "tag/events", 0),
            (MenuItemKind::Operation, "operation/listEvents", 1),
            (MenuItemKind::Section, "operation/listEvents/filtering", 2),
            (MenuItemKind::Section, "operation/listEvents/paging", 2),
            (MenuItemKind::Operation, "operation/createEvent", 1),
            (MenuItemKind::Group, "tag/tickets", 0),
            (MenuItemKind::Operation, "operation/getTicket", 1),
            (MenuItemKind::Group, "tag/other", 0),
            (MenuItemKind::Operation, "tag/other/paths/~1health/get", 1),
        ]
    );
}

#[test]
fn exactly_one_item_is_active_at_a_time() {
    let api = load();
    let menu = &api.menu;

    assert!(menu.activate_by_id("operation/listEvents"));
    let list = menu.active_item().unwrap().operation().unwrap().clone();
    assert!(list.flags.is_active());

    assert!(menu.activate_by_id("operation/getTicket"));
    let ticket = menu.active_item().unwrap().operation().unwrap().clone();
    assert!(!list.flags.is_active(), "previous item must deactivate");
    assert!(ticket.flags.is_active());

    // Unknown ids change nothing.
    assert!(!menu.activate_by_id("operation/nope"));
    assert!(ticket.flags.is_active());

    menu.activate(None);
    assert!(!ticket.flags.is_active());
    assert!(menu.active_item().is_none());
}

#[test]
fn activating_an_operation_expands_its_group() {
    let api = load();
    let events_group = api
        .groups
        .iter()
        .find(|g| g.id == "tag/events")
        .unwrap()
        .clone();
    assert!(!events_group.flags.is_expanded());

    api.menu.activate_by_id("operation/listEvents");
    assert!(events_group.flags.is_expanded());
}

#[test]
fn expanding_a_callback_expands_the_ancestor_chain() {
    let api = load();
    let events_group = api
        .groups
        .iter()
        .find(|g| g.id == "tag/events")
        .unwrap()
        .clone();
    let create = events_group
        .operations()
        .iter()
        .find(|op| op.id == "operation/createEvent")
        .unwrap()
        .clone();

    let callbacks = create.callbacks().unwrap();
    let reminder = &callbacks[0];
    assert!(!reminder.is_expanded(), "callbacks start collapsed");

    reminder.toggle();
    assert!(reminder.is_expanded());
    assert!(
        events_group.flags.is_expanded(),
        "deep expansion must reach the group"
    );

    reminder.toggle();
    assert!(!reminder.is_expanded());
    // Collapsing a callback leaves the ancestors alone.
    assert!(events_group.flags.is_expanded());
}

#[test]
fn view_events_reach_subscribers() {
    let api = load();
    let seen: Rc<RefCell<Vec<ViewEvent>>> = Rc::default();
    let sink = Rc::clone(&seen);
    api.notifier().subscribe(move |event| sink.borrow_mut().push(event.clone()));

    api.menu.activate_by_id("operation/listEvents");

    let events = seen.borrow();
    assert!(events.contains(&ViewEvent::Activated {
        id: "operation/listEvents".to_string()
    }));
    assert!(events.contains(&ViewEvent::ExpandedChanged {
        id: "tag/events".to_string(),
        expanded: true
    }));
}
