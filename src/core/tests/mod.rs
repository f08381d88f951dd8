mod event_scheduler_tests;
mod simulation_engine_tests;
