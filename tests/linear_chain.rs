// tests/linear_chain.rs
//
// Seed scenarios over the linear chain Tax -> Compta -> Previsions -> Decideur:
// full run from the root, mid-chain run, and leaf run.

use calcdag::RecalcScheduler;
use calcdag::engine::ContextInputs;

use calcdag_test_utils::builders::financial_chain;
use calcdag_test_utils::handlers::{call_log, calls, register_recording_handlers};
use calcdag_test_utils::{init_tracing, with_timeout};

fn order_names(result: &calcdag::engine::RunResult) -> Vec<&str> {
    result.order.iter().map(|n| n.as_str()).collect()
}

#[tokio::test]
async fn run_from_root_recomputes_whole_chain_in_order() {
    init_tracing();
    with_timeout(async {
        let scheduler = RecalcScheduler::new(financial_chain());
        let log = call_log();
        register_recording_handlers(scheduler.registry(), scheduler.graph(), &log);

        let result = scheduler
            .run_recalculation("Tax", ContextInputs::new("user-1"))
            .await
            .expect("Tax is a declared node");

        assert_eq!(
            order_names(&result),
            ["Tax", "Compta", "Previsions", "Decideur"]
        );
        // Handlers were invoked in exactly the resolved order.
        assert_eq!(calls(&log), ["Tax", "Compta", "Previsions", "Decideur"]);

        // One output per node in the order, all ok.
        assert_eq!(result.outputs.len(), result.order.len());
        for node in &result.order {
            let output = result.output(node.as_str()).expect("output present");
            assert!(output.is_ok(), "node {node} should be ok");
            assert!(output.details.is_some());
            assert!(output.error.is_none());
        }
    })
    .await;
}

#[tokio::test]
async fn run_from_mid_chain_never_touches_upstream() {
    init_tracing();
    with_timeout(async {
        let scheduler = RecalcScheduler::new(financial_chain());
        let log = call_log();
        register_recording_handlers(scheduler.registry(), scheduler.graph(), &log);

        let result = scheduler
            .run_recalculation("Previsions", ContextInputs::new("user-1"))
            .await
            .expect("Previsions is a declared node");

        assert_eq!(order_names(&result), ["Previsions", "Decideur"]);
        assert_eq!(calls(&log), ["Previsions", "Decideur"]);
        assert!(result.output("Tax").is_none());
        assert!(result.output("Compta").is_none());
    })
    .await;
}

#[tokio::test]
async fn run_from_leaf_yields_single_output() {
    init_tracing();
    with_timeout(async {
        let scheduler = RecalcScheduler::new(financial_chain());
        let log = call_log();
        register_recording_handlers(scheduler.registry(), scheduler.graph(), &log);

        let result = scheduler
            .run_recalculation("Decideur", ContextInputs::new("user-1"))
            .await
            .expect("Decideur is a declared node");

        assert_eq!(order_names(&result), ["Decideur"]);
        assert_eq!(result.outputs.len(), 1);
        assert_eq!(calls(&log), ["Decideur"]);
    })
    .await;
}

#[tokio::test]
async fn handlers_receive_the_shared_run_context() {
    init_tracing();
    with_timeout(async {
        let scheduler = RecalcScheduler::new(financial_chain());
        let log = call_log();
        register_recording_handlers(scheduler.registry(), scheduler.graph(), &log);

        let inputs = ContextInputs::new("user-42").with_fiscal_year(2026);
        let result = scheduler
            .run_recalculation("Tax", inputs)
            .await
            .expect("Tax is a declared node");

        for node in &result.order {
            let details = result
                .output(node.as_str())
                .and_then(|o| o.details.as_ref())
                .expect("ok output carries details");
            assert_eq!(details["subject"], "user-42");
        }
    })
    .await;
}
