use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use volition::agent::SimAgent;
use volition::core::types::LayerRef;
use volition::rules::consequent::Consequent;
use volition::rules::decision_option::DecisionOption;
use volition::simulation::action_taking::ActionTaking;
use volition::state::agent_state::AgentState;
use volition::state::common_pool::CommonPool;

fn bench_action_taking_pass(c: &mut Criterion) {
    let pool = Arc::new(CommonPool::new());
    let taking = ActionTaking::new();

    c.bench_function("execute_64_options", |b| {
        b.iter(|| {
            let mut agent = SimAgent::new("A1", Arc::clone(&pool)).with_variable("yield", 10.0);
            let mut state: AgentState<u32> = AgentState::new();

            for set in 0..8u32 {
                for position in 0..8u32 {
                    state.activate(
                        &1,
                        DecisionOption::new(
                            LayerRef::new(set, 1),
                            position,
                            vec![],
                            Consequent::new("yield", f64::from(set * 8 + position))
                                .with_save_previous()
                                .with_copy_to_common(),
                        ),
                    );
                }
            }

            taking.execute(&mut agent, &mut state, &1).unwrap();
            state
        });
    });
}

criterion_group!(benches, bench_action_taking_pass);
criterion_main!(benches);
