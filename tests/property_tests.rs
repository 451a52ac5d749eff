//! Property-based tests for the state machine.
//!
//! These tests use proptest to drive machines over randomly generated
//! transition graphs and walks, checking them against a plain adjacency
//! model.

use engineering::core::State;
use engineering::{state_enum, Machine, MachineConfig};
use proptest::prelude::*;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

state_enum! {
    enum Stage {
        Queued => "queued",
        Running => "running",
        Paused => "paused",
        Done => "done",
    }
}

const STAGES: [Stage; 4] = [Stage::Queued, Stage::Running, Stage::Paused, Stage::Done];

type Adjacency = BTreeMap<Stage, Vec<Stage>>;

prop_compose! {
    fn arbitrary_stage()(index in 0..STAGES.len()) -> Stage {
        STAGES[index]
    }
}

prop_compose! {
    /// Random adjacency over all four stages, edges drawn from a 4x4 matrix.
    fn arbitrary_graph()(edges in prop::collection::vec(any::<bool>(), 16)) -> Adjacency {
        STAGES
            .iter()
            .enumerate()
            .map(|(row, from)| {
                let successors = STAGES
                    .iter()
                    .enumerate()
                    .filter(|(col, _)| edges[row * STAGES.len() + col])
                    .map(|(_, to)| *to)
                    .collect();
                (*from, successors)
            })
            .collect()
    }
}

fn machine(adjacency: &Adjacency, initial: Stage) -> Machine<Stage, u32> {
    Machine::new(MachineConfig::new(adjacency.clone(), initial)).unwrap()
}

fn allowed(adjacency: &Adjacency, from: Stage, to: Stage) -> bool {
    adjacency.get(&from).is_some_and(|s| s.contains(&to))
}

proptest! {
    #[test]
    fn transitions_follow_the_graph(
        adjacency in arbitrary_graph(),
        initial in arbitrary_stage(),
        walk in prop::collection::vec(arbitrary_stage(), 0..32)
    ) {
        let machine = machine(&adjacency, initial);
        let mut model = initial;

        for target in walk {
            let result = machine.to(target, []);
            prop_assert_eq!(result.is_ok(), allowed(&adjacency, model, target));
            if result.is_ok() {
                model = target;
            }
            prop_assert_eq!(machine.current(), model);
            prop_assert!(machine.is(model));
        }
    }

    #[test]
    fn failed_transitions_keep_last_arguments(
        adjacency in arbitrary_graph(),
        initial in arbitrary_stage(),
        walk in prop::collection::vec((arbitrary_stage(), any::<u32>()), 0..32)
    ) {
        let machine = machine(&adjacency, initial);
        let mut last: Vec<u32> = Vec::new();

        for (target, arg) in walk {
            if machine.to(target, [arg]).is_ok() {
                last = vec![arg];
            }
            let args = machine.args();
            prop_assert_eq!(&*args, last.as_slice());
        }
    }

    #[test]
    fn states_are_sorted_and_independent_copies(
        adjacency in arbitrary_graph(),
        initial in arbitrary_stage()
    ) {
        let machine = machine(&adjacency, initial);

        let mut first = machine.states();
        prop_assert_eq!(&first, &STAGES.to_vec());

        first.retain(|s| *s == initial);
        prop_assert_eq!(machine.states().len(), STAGES.len());
    }

    #[test]
    fn on_counts_entries_and_once_fires_at_most_once(
        adjacency in arbitrary_graph(),
        initial in arbitrary_stage(),
        watched in arbitrary_stage(),
        walk in prop::collection::vec(arbitrary_stage(), 0..32)
    ) {
        let machine = machine(&adjacency, initial);
        let on_count = Rc::new(Cell::new(0usize));
        let once_count = Rc::new(Cell::new(0usize));

        let counter = Rc::clone(&on_count);
        machine.on(watched, move |_| counter.set(counter.get() + 1));
        let counter = Rc::clone(&once_count);
        machine.once(watched, move |_| counter.set(counter.get() + 1));

        let mut entries = usize::from(initial == watched);
        for target in walk {
            if machine.to(target, []).is_ok() && target == watched {
                entries += 1;
            }
        }

        prop_assert_eq!(on_count.get(), entries);
        prop_assert_eq!(once_count.get(), entries.min(1));
    }

    #[test]
    fn listeners_run_in_registration_order(
        adjacency in arbitrary_graph(),
        initial in arbitrary_stage(),
        target in arbitrary_stage(),
        count in 1..8usize
    ) {
        prop_assume!(initial != target && allowed(&adjacency, initial, target));
        let machine = machine(&adjacency, initial);
        let order = Rc::new(RefCell::new(Vec::new()));

        for i in 0..count {
            let order = Rc::clone(&order);
            if i % 2 == 0 {
                machine.on(target, move |_| order.borrow_mut().push(i));
            } else {
                machine.once(target, move |_| order.borrow_mut().push(i));
            }
        }
        machine.to(target, []).unwrap();

        prop_assert_eq!(order.borrow().clone(), (0..count).collect::<Vec<_>>());
    }

    #[test]
    fn every_successful_transition_drains_pending_watches(
        adjacency in arbitrary_graph(),
        initial in arbitrary_stage(),
        watched in prop::collection::vec(arbitrary_stage(), 1..6),
        target in arbitrary_stage()
    ) {
        prop_assume!(watched.iter().all(|s| *s != initial));
        let machine = machine(&adjacency, initial);
        let fired = Rc::new(Cell::new(0usize));

        for state in &watched {
            let hit = Rc::clone(&fired);
            let miss = Rc::clone(&fired);
            machine
                .when(*state, move |_| hit.set(hit.get() + 1))
                .otherwise(move |_| miss.set(miss.get() + 1));
        }
        prop_assert_eq!(machine.pending_watches(), watched.len());

        if machine.to(target, []).is_ok() {
            prop_assert_eq!(machine.pending_watches(), 0);
            prop_assert_eq!(fired.get(), watched.len());
        } else {
            prop_assert_eq!(machine.pending_watches(), watched.len());
            prop_assert_eq!(fired.get(), 0);
        }
    }

    #[test]
    fn at_selects_the_current_state(
        adjacency in arbitrary_graph(),
        initial in arbitrary_stage(),
        branches in prop::collection::vec(arbitrary_stage(), 0..4)
    ) {
        let machine = machine(&adjacency, initial);

        let answer = branches
            .iter()
            .fold(machine.at(Stage::Done, |_| Some(Stage::Done)), |query, stage| {
                let stage = *stage;
                query.at(stage, move |_| Some(stage))
            })
            .otherwise(|_| None);

        let expected = (initial == Stage::Done || branches.contains(&initial)).then_some(initial);
        prop_assert_eq!(answer, expected);
    }

    #[test]
    fn unknown_successor_names_are_rejected(
        name in "[a-z]{3,8}",
        initial in arbitrary_stage()
    ) {
        prop_assume!(STAGES.iter().all(|s| s.name() != name));

        let json = format!(
            r#"{{ "states": {{ "queued": ["{name}"], "done": [] }}, "default": "{}" }}"#,
            initial.name()
        );
        let result = Machine::<Stage>::from_json(&json);

        prop_assert_eq!(result.unwrap_err().to_string(), format!("Unknown state transition: {name}"));
    }
}
