// tests/handler_timeouts.rs
//
// Per-node timeouts and panic containment: both count as handler execution
// failures and trigger the same downstream-blocking policy.

use std::time::Duration;

use calcdag::RecalcScheduler;
use calcdag::engine::{ContextInputs, EngineOptions, FailureReason, NodeFailure};

use calcdag_test_utils::builders::{GraphBuilder, financial_chain};
use calcdag_test_utils::handlers::{
    PanickingHandler, SleepyHandler, call_log, calls, register_recording_handlers,
};
use calcdag_test_utils::{init_tracing, with_timeout};

#[tokio::test]
async fn slow_handler_times_out_and_blocks_downstream() {
    init_tracing();
    with_timeout(async {
        let options = EngineOptions {
            node_timeout: Duration::from_millis(50),
        };
        let scheduler = RecalcScheduler::with_options(financial_chain(), options);
        let log = call_log();
        register_recording_handlers(scheduler.registry(), scheduler.graph(), &log);
        scheduler
            .registry()
            .register("Compta", SleepyHandler::new(Duration::from_secs(60)));

        let result = scheduler
            .run_recalculation("Tax", ContextInputs::new("user-1"))
            .await
            .unwrap();

        assert!(result.output("Tax").unwrap().is_ok());

        match result.output("Compta").unwrap().failure().unwrap() {
            NodeFailure::HandlerExecution { reason, .. } => {
                assert_eq!(*reason, FailureReason::Timeout);
            }
            other => panic!("expected HandlerExecution, got {other:?}"),
        }
        assert!(matches!(
            result.output("Previsions").unwrap().failure().unwrap(),
            NodeFailure::Blocked { .. }
        ));
    })
    .await;
}

#[tokio::test]
async fn panicking_handler_is_contained_to_its_node() {
    init_tracing();
    with_timeout(async {
        // Tax fans out: the panicking branch must not take the sibling down.
        let graph = GraphBuilder::new()
            .node("Tax")
            .node("Compta")
            .node("Previsions")
            .edge("Tax", "Compta")
            .edge("Tax", "Previsions")
            .build();
        let scheduler = RecalcScheduler::new(graph);
        let log = call_log();
        register_recording_handlers(scheduler.registry(), scheduler.graph(), &log);
        scheduler.registry().register("Compta", PanickingHandler::new());

        let result = scheduler
            .run_recalculation("Tax", ContextInputs::new("user-1"))
            .await
            .unwrap();

        match result.output("Compta").unwrap().failure().unwrap() {
            NodeFailure::HandlerExecution { reason, .. } => {
                assert_eq!(*reason, FailureReason::Panic);
            }
            other => panic!("expected HandlerExecution, got {other:?}"),
        }
        // The sibling branch still ran to completion.
        assert!(result.output("Previsions").unwrap().is_ok());
        assert!(calls(&log).contains(&"Previsions".to_string()));
    })
    .await;
}
