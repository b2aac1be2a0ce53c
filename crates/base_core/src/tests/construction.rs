use super::*;

#[test]
fn tick_counts_down_and_completes_once() {
    let content = test_content();
    let mut state = test_state(&content);
    let mut events = Vec::new();
    expect_applied(assign(
        &mut state,
        &alpha(),
        &cpu("item_fast_cpu", 2),
        &content,
        &mut events,
    ));

    for _ in 0..239 {
        let events = tick(&mut state, &content);
        assert!(events.is_empty());
    }
    assert_eq!(cpu_slot(&state).unwrap().cost_left, 1);

    let events = tick(&mut state, &content);
    assert_eq!(
        events[0].event,
        Event::ConstructionCompleted {
            base_id: alpha(),
            category: ItemCategory::Cpu,
            item_type: ItemTypeId::new("item_fast_cpu"),
        }
    );
    assert_eq!(power_checks(&events), 1);
    assert!(cpu_slot(&state).unwrap().done);
    assert_eq!(state.base(&alpha()).unwrap().processor_time, 6);

    assert!(tick(&mut state, &content).is_empty(), "nothing left to build");
    assert_eq!(state.meta.tick, 241);
}

#[test]
fn merged_stack_finishes_after_combined_time() {
    let content = test_content();
    let mut state = test_state(&content);
    let mut events = Vec::new();
    expect_applied(assign(
        &mut state,
        &alpha(),
        &cpu("item_basic_cpu", 2),
        &content,
        &mut events,
    ));
    for _ in 0..100 {
        tick(&mut state, &content);
    }
    let merged = expect_applied(assign(
        &mut state,
        &alpha(),
        &cpu("item_basic_cpu", 1),
        &content,
        &mut events,
    ));
    assert_eq!(merged.instance.cost_left, 80, "20 left of the first build + 60");

    run_construction(&mut state, &content);
    assert_eq!(state.meta.tick, 180);
    assert_eq!(cpu_slot(&state).unwrap().count, 3);
}

#[test]
fn completion_events_are_stamped_with_the_tick() {
    let content = test_content();
    let mut state = test_state(&content);
    let mut events = Vec::new();
    expect_applied(assign(
        &mut state,
        &alpha(),
        &extra(ItemCategory::Reactor, "item_diesel_generator"),
        &content,
        &mut events,
    ));

    let construction = run_construction(&mut state, &content);
    let completed = construction
        .iter()
        .find(|e| matches!(e.event, Event::ConstructionCompleted { .. }))
        .unwrap();
    assert_eq!(completed.tick, 29);
}
