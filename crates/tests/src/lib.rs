//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置加载 -> 会话控制 -> sinks 的端到端测试（虚拟时间）

#[cfg(test)]
mod contract_tests {
    use contracts::{Coordinate, MovementProfile, PlaybackMode};

    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
        assert_eq!(PlaybackMode::Route.as_str(), "route");
    }

    #[test]
    fn test_fix_json_shape() {
        let fix = contracts::LocationFix::new(
            Coordinate::new(35.0, 139.0),
            std::time::Duration::from_millis(2_000),
        );
        let value = serde_json::to_value(&fix).unwrap();
        assert_eq!(value["provider"], "mock_provider");
        assert_eq!(value["accuracy_m"], 1.0);
        assert_eq!(value["elapsed_ms"], 2000);
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_profile_steps() {
        assert_eq!(MovementProfile::from_ordinal(2), MovementProfile::Car);
        assert_eq!(MovementProfile::Car.step_degrees(), 0.000_105);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        Coordinate, MovementProfile, PatrolCommand, RouteCommand, SessionOutcome,
        SimulatorConfig,
    };
    use playback::{MemorySink, SessionController, SinkSet, StartOutcome};

    fn fast_config() -> SimulatorConfig {
        ConfigLoader::load_from_str(
            r#"
[playback]
tick_ms = 1000
patrol_initial_delay_ms = 0
"#,
            ConfigFormat::Toml,
        )
        .unwrap()
    }

    /// Config file -> SinkSet(log + file) -> patrol session -> JSON-lines on disk
    #[tokio::test(start_paused = true)]
    async fn test_e2e_patrol_to_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("fixes.jsonl");
        let toml = format!(
            r#"
[playback]
patrol_initial_delay_ms = 0

[patrol]
profile = "walk"
radius_steps = 100

[[sinks]]
name = "console"
sink_type = "log"

[[sinks]]
name = "trace"
sink_type = "file"
[sinks.params]
path = "{}"
"#,
            out.display()
        );
        let config = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        let sinks = SinkSet::from_configs(&config.sinks).unwrap();
        let mut control = SessionController::new(sinks, &config);

        let command = PatrolCommand::new(Coordinate::new(35.0, 139.0), config.patrol.profile)
            .with_radius(config.patrol.radius_steps);
        control.start(command.into()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        let report = control.stop().await.unwrap().unwrap();
        assert_eq!(report.outcome, SessionOutcome::Success);
        assert_eq!(report.published, 3);

        let content = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["coordinate"]["latitude"], 35.0);
        assert_eq!(lines[1]["coordinate"]["latitude"], 35.000007);
        assert_eq!(lines[2]["coordinate"]["latitude"], 35.000014);
        assert_eq!(lines[2]["coordinate"]["longitude"], 139.0);
    }

    /// A full patrol cycle comes back to the start point
    #[tokio::test(start_paused = true)]
    async fn test_e2e_patrol_full_cycle() {
        let config = fast_config();
        let sink = MemorySink::new("mem");
        let recorder = sink.recorder();
        let mut control = SessionController::new(sink, &config);

        let start = Coordinate::new(-33.8688, 151.2093);
        let command = PatrolCommand::new(start, MovementProfile::Car).with_radius(2);
        control.start(command.into()).await.unwrap();

        // 10 * radius steps around the square, fixes at t = 0..=20
        tokio::time::sleep(Duration::from_millis(20_500)).await;
        control.stop().await.unwrap();

        let points = recorder.coordinates();
        assert_eq!(points.len(), 21);
        assert!(points[20].same_as(&start));
        assert!(points[2].same_as(&Coordinate::new(-33.8688 + 0.00021, 151.2093)));
        assert!(points[4].same_as(&Coordinate::new(-33.8688 + 0.00021, 151.2093 - 0.00021)));
    }

    /// Route start replaces the running patrol; the route plays once, then idles
    #[tokio::test(start_paused = true)]
    async fn test_e2e_route_replaces_patrol_and_idles() {
        let config = fast_config();
        let sink = MemorySink::new("mem");
        let recorder = sink.recorder();
        let mut control = SessionController::new(sink, &config);

        control
            .start(PatrolCommand::new(Coordinate::new(35.0, 139.0), MovementProfile::Walk).into())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(recorder.publish_count(), 2);

        // 36 km/h = 10 m per tick over ~111 m
        let descriptor = r#"{
            "speed": 36.0, "repeat": 0, "reverse": false, "delay": 0,
            "coordinates": [
                {"latitude": 0.0, "longitude": 0.0},
                {"latitude": 0.0, "longitude": 0.001}
            ]
        }"#;
        let outcome = control.start(RouteCommand::new(descriptor).into()).await.unwrap();
        assert!(matches!(outcome, StartOutcome::Replaced { session_id: 2, .. }));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(control.is_active());

        let report = control.stop().await.unwrap().unwrap();
        assert_eq!(report.outcome, SessionOutcome::Success);
        assert_eq!(report.published, 12);
        assert!(report.ticks > report.published);

        let route_points = &recorder.coordinates()[2..];
        assert_eq!(route_points.len(), 12);
        assert_eq!(route_points[0], Coordinate::new(0.0, 0.0));
        assert_eq!(route_points[11], Coordinate::new(0.0, 0.001));
        assert_eq!(recorder.enable_count(), 2);
        assert_eq!(recorder.disable_count(), 2);
    }

    /// A sink failure at tick k ends the session with Failure after k - 1 fixes
    #[tokio::test(start_paused = true)]
    async fn test_e2e_sink_failure_surfaces_in_report() {
        let mut config = fast_config();
        config.playback.tick_ms = 500;
        let sink = MemorySink::new("mem");
        let recorder = sink.recorder();
        recorder.fail_on_publish(3);
        let mut control = SessionController::new(sink, &config);

        control
            .start(PatrolCommand::new(Coordinate::new(1.0, 1.0), MovementProfile::Bike).into())
            .await
            .unwrap();
        let report = control.wait().await.unwrap().unwrap();

        assert_eq!(report.outcome, SessionOutcome::Failure);
        assert_eq!(report.published, 2);
        assert_eq!(report.ticks, 3);
        assert!(report.elapsed >= Duration::from_secs(1));
        assert!(report.elapsed < Duration::from_millis(1_500));
        assert!(report.failure_reason.unwrap().contains("mem"));
        assert!(!recorder.is_simulating());
        assert!(!control.is_active());
    }

    /// Unparseable descriptor: session idles until stopped, still Success
    #[tokio::test(start_paused = true)]
    async fn test_e2e_malformed_descriptor_idles() {
        let config = fast_config();
        let sink = MemorySink::new("mem");
        let recorder = sink.recorder();
        let mut control = SessionController::new(sink, &config);

        control.start(RouteCommand::default().into()).await.unwrap();
        tokio::time::sleep(Duration::from_secs(12)).await;
        let report = control.stop().await.unwrap().unwrap();

        assert_eq!(report.outcome, SessionOutcome::Success);
        assert_eq!(recorder.publish_count(), 0);
        assert_eq!(recorder.disable_count(), 1);
    }
}
