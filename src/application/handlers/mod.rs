pub mod dispatch_orchestrator;
