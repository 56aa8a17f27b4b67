use std::{cell::RefCell, rc::Rc};

use crossterm::event::KeyCode;
use time::macros::date;

use super::{TODAY, key};
use crate::{
    binding::{ChangeEvent, DirectBinding},
    domain::{DateMode, FieldSpec, OptionEntry, OptionGroup, OptionItem, ResolvedValue, Variant},
    form::{Control, ControlProps, DropdownRow},
    overlay::PointerHub,
};

fn date_control(hub: &PointerHub, mode: DateMode, initial: &str) -> Control {
    let (direct, _state) = DirectBinding::local(ResolvedValue::from(initial));
    let spec = FieldSpec::new("when", "When", Variant::Date)
        .with_date_mode(mode)
        .with_date_bounds(Some(date!(2024 - 01 - 01)), Some(date!(2024 - 12 - 31)));
    Control::new(ControlProps::new(spec).with_direct(direct), hub).with_today(TODAY)
}

#[test]
fn bars_select_replaces_and_closes() {
    let hub = PointerHub::new();
    let spec = FieldSpec::new("tier", "Tier", Variant::Select).with_show_as_bars(true);
    let mut control = Control::new(
        ControlProps::new(spec).with_options(["X", "Y"].map(OptionEntry::from)),
        &hub,
    );
    assert!(control.spec().searchable());

    control.open();
    assert!(control.select_option("X"));
    assert!(!control.is_open());
    control.open();
    assert!(control.select_option("Y"));

    assert_eq!(control.value(), ResolvedValue::from("Y"));
    assert!(!control.is_open());
    assert_eq!(hub.active_listeners(), 0);
}

#[test]
fn repeated_open_close_cycles_leave_no_listeners() {
    let hub = PointerHub::new();
    let mut control = date_control(&hub, DateMode::None, "");
    for _ in 0..25 {
        control.activate();
        assert!(control.is_open());
        assert_eq!(hub.active_listeners(), 1);
        control.activate();
        assert!(!control.is_open());
        assert_eq!(hub.active_listeners(), 0);
    }
    control.open();
    control.open();
    assert_eq!(hub.active_listeners(), 1, "reopening replaces the listener");
    drop(control);
    assert_eq!(hub.active_listeners(), 0, "dropping an open control releases it");
}

#[test]
fn closing_discards_the_search_query() {
    let hub = PointerHub::new();
    let spec = FieldSpec::new("team", "Team", Variant::Select).with_allow_multiple(true);
    let mut control = Control::new(
        ControlProps::new(spec).with_options(["Alice", "Bob"].map(OptionEntry::from)),
        &hub,
    );
    control.open();
    control.handle_key(&key(KeyCode::Char('z')));
    assert!(control.visible_options().is_empty());
    control.close();
    control.open();
    assert_eq!(control.search(), "");
    assert_eq!(control.visible_options().len(), 2);
}

#[test]
fn dropdown_rows_follow_the_filtered_groups() {
    let hub = PointerHub::new();
    let spec = FieldSpec::new("fruit", "Fruit", Variant::Select).with_allow_multiple(true);
    let mut control = Control::new(
        ControlProps::new(spec).with_options([
            OptionGroup::new("A", ["Apple", "Avocado"].map(OptionItem::simple)).into(),
            OptionGroup::new("B", [OptionItem::simple("Banana")]).into(),
        ]),
        &hub,
    );
    control.open();
    control.set_search("av");
    assert_eq!(
        control.dropdown_rows(),
        vec![
            DropdownRow::Header("A".into()),
            DropdownRow::Item(OptionItem::simple("Avocado")),
        ]
    );
}

#[test]
fn picking_a_day_emits_iso_text_and_closes() {
    let hub = PointerHub::new();
    let mut control = date_control(&hub, DateMode::None, "");
    control.open();
    assert!(control.pick_date(date!(2024 - 07 - 04)));
    assert_eq!(control.value(), ResolvedValue::from("2024-07-04"));
    assert!(!control.is_open());
    assert_eq!(hub.active_listeners(), 0);

    control.open();
    assert!(!control.pick_date(date!(2025 - 01 - 01)), "outside max bound");
    assert!(control.is_open());
}

#[test]
fn calendar_keys_move_the_cursor_and_commit() {
    let hub = PointerHub::new();
    let mut control = date_control(&hub, DateMode::None, "2024-06-10");
    control.handle_key(&key(KeyCode::Enter));
    let calendar = control.calendar().expect("calendar open");
    assert_eq!(calendar.cursor(), date!(2024 - 06 - 10));

    control.handle_key(&key(KeyCode::Right));
    control.handle_key(&key(KeyCode::Down));
    control.handle_key(&key(KeyCode::Enter));
    assert_eq!(control.value(), ResolvedValue::from("2024-06-18"));
    assert!(!control.is_open());
}

#[test]
fn calendar_navigation_stops_at_bounds() {
    let hub = PointerHub::new();
    let mut control = date_control(&hub, DateMode::None, "2024-01-03");
    control.open();
    control.handle_key(&key(KeyCode::PageUp));
    control.handle_key(&key(KeyCode::Up));
    let calendar = control.calendar().expect("calendar open");
    assert_eq!(calendar.year(), 2024);
    assert_eq!(calendar.month(), time::Month::January);
    assert!(!calendar.can_go_prev());
    assert_eq!(calendar.cursor(), date!(2024 - 01 - 03));
}

#[test]
fn birth_and_expiry_badges_use_today() {
    let hub = PointerHub::new();
    let birth = date_control(&hub, DateMode::Birth, "1990-06-16");
    assert_eq!(birth.badge().as_deref(), Some("33yrs"));
    let birth = date_control(&hub, DateMode::Birth, "1990-06-14");
    assert_eq!(birth.badge().as_deref(), Some("34yrs"));

    let expiry = date_control(&hub, DateMode::Expiry, "2024-06-18");
    assert_eq!(expiry.badge().as_deref(), Some("in 3 days"));
    let plain = date_control(&hub, DateMode::None, "2024-06-18");
    assert!(plain.badge().is_none());
    let unparsable = date_control(&hub, DateMode::Birth, "someday");
    assert!(unparsable.badge().is_none());
}

#[test]
fn checkbox_group_emits_the_full_array_each_time() {
    let hub = PointerHub::new();
    let state = Rc::new(RefCell::new(ResolvedValue::List(Vec::new())));
    let events = Rc::new(RefCell::new(Vec::<ChangeEvent>::new()));
    let (reader, writer, log) = (Rc::clone(&state), Rc::clone(&state), Rc::clone(&events));
    let direct = DirectBinding::new(
        move || reader.borrow().clone(),
        move |event: &ChangeEvent| {
            *writer.borrow_mut() = event.target.value.clone();
            log.borrow_mut().push(event.clone());
        },
    );
    let mut control = Control::new(
        ControlProps::new(FieldSpec::new("channels", "Channels", Variant::CheckboxGroup))
            .with_options(["Email", "SMS", "Phone"].map(OptionEntry::from))
            .with_direct(direct),
        &hub,
    );

    control.toggle_group_option(0);
    control.toggle_group_option(2);
    control.toggle_group_option(0);

    let emitted = events
        .borrow()
        .iter()
        .map(|event| event.target.value.clone())
        .collect::<Vec<_>>();
    assert_eq!(
        emitted,
        vec![
            ResolvedValue::List(vec!["Email".into()]),
            ResolvedValue::List(vec!["Email".into(), "Phone".into()]),
            ResolvedValue::List(vec!["Phone".into()]),
        ]
    );
    assert!(!control.toggle_group_option(7));
}

#[test]
fn removing_tokens_keeps_the_rest_in_order() {
    let hub = PointerHub::new();
    let (direct, state) = DirectBinding::local(ResolvedValue::List(vec![
        "a".into(),
        "b".into(),
        "c".into(),
    ]));
    let spec = FieldSpec::new("tags", "Tags", Variant::Select).with_allow_multiple(true);
    let mut control = Control::new(
        ControlProps::new(spec)
            .with_options(["a", "b", "c"].map(OptionEntry::from))
            .with_direct(direct),
        &hub,
    );
    assert!(control.remove_token("b"));
    assert!(!control.remove_token("b"));
    assert_eq!(*state.borrow(), ResolvedValue::List(vec!["a".into(), "c".into()]));

    control.handle_key(&key(KeyCode::Backspace));
    assert_eq!(*state.borrow(), ResolvedValue::List(vec!["a".into()]));
}

#[test]
fn reopening_a_single_select_highlights_the_current_value() {
    let hub = PointerHub::new();
    let (direct, state) = DirectBinding::local(ResolvedValue::from("c"));
    let mut control = Control::new(
        ControlProps::new(FieldSpec::new("letter", "Letter", Variant::Select))
            .with_options(["a", "b", "c"].map(OptionEntry::from))
            .with_direct(direct),
        &hub,
    );
    assert!(control.open());
    assert_eq!(control.highlight(), 2);
    control.handle_key(&key(KeyCode::Enter));
    assert_eq!(*state.borrow(), ResolvedValue::from("c"));
    assert!(!control.is_open());
}
