//! Reboot check against snapshot directories
//!
//! Each test builds a fake snapshot root (release file + syslog) in a temp dir
//! and runs the check the same way the CLI does.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use sysaudit_common::reboot::{Description, EventContext, FindingKind, RebootStatus};
use sysaudit_common::{AuditConfig, AuditError, Check, CheckContext, CheckStatus, RebootCheck};
use tempfile::TempDir;

const RHEL7: &str = "Red Hat Enterprise Linux Server release 7.9 (Maipo)\n";

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn snapshot(release: Option<&str>, messages: Option<&str>) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    if let Some(release) = release {
        fs::create_dir_all(dir.path().join("etc")).unwrap();
        fs::write(dir.path().join("etc/redhat-release"), release).unwrap();
    }
    if let Some(messages) = messages {
        fs::create_dir_all(dir.path().join("var/log")).unwrap();
        fs::write(dir.path().join("var/log/messages"), messages).unwrap();
    }
    dir
}

fn ctx(root: &Path) -> CheckContext {
    let config = AuditConfig {
        root: root.to_path_buf(),
        ..AuditConfig::default()
    };
    CheckContext::new(config, now())
}

#[test]
fn test_clean_reboot_is_ok() {
    let dir = snapshot(
        Some(RHEL7),
        Some(
            "May 20 10:00:00 web1 systemd-journald[512]: Journal stopped\n\
             May 20 10:01:00 web1 systemd-journald[488]: Journal started\n",
        ),
    );
    let check = RebootCheck;
    let result = check.run(&ctx(dir.path())).unwrap();
    assert_eq!(result.status, CheckStatus::Ok);
    assert_eq!(result.id, "core/system/reboot");
    assert!(result.text.starts_with("0 problem(s) found\n"));
    assert!(result.text.contains("2024-05-20 10:01:00 os         start           clean"));

    let report = check.analyze(&ctx(dir.path())).unwrap().unwrap();
    assert_eq!(report.events[1].duration_down, 60.0);
    assert_eq!(report.events[1].status, RebootStatus::Clean);
}

#[test]
fn test_long_gap_is_hard_reboot() {
    let dir = snapshot(
        Some(RHEL7),
        Some(
            "May 20 10:00:00 web1 systemd-journald[488]: Journal started\n\
             May 20 10:00:10 web1 systemd-journald[488]: Journal stopped\n\
             May 20 10:06:40 web1 systemd-journald[490]: Journal started\n",
        ),
    );
    let check = RebootCheck;
    let report = check.analyze(&ctx(dir.path())).unwrap().unwrap();
    assert_eq!(report.events[2].duration_down, 390.0);
    assert_eq!(report.events[2].status, RebootStatus::Hard);
    // the first start has no stop before it in the log, so it counts as well
    assert_eq!(report.events[0].status, RebootStatus::Hard);

    let result = check.run(&ctx(dir.path())).unwrap();
    assert_eq!(result.status, CheckStatus::Failed);
    assert!(result.text.starts_with("2 problem(s) found\n"));
    assert!(result.text.contains("- hard reboot found (2024-05-20 10:06:40)"));
}

#[test]
fn test_bootloader_span_under_limit() {
    let dir = snapshot(
        Some(RHEL7),
        Some(
            "May 20 10:00:00 web1 kernel: Command line: BOOT_IMAGE=/vmlinuz-3.10.0 ro crashkernel=auto\n\
             May 20 10:00:05 web1 systemd-journald[90]: Journal started\n\
             May 20 10:00:15 web1 systemd-journald[90]: Journal stopped\n\
             May 20 10:00:16 web1 systemd-journald[488]: Journal started\n",
        ),
    );
    let report = RebootCheck.analyze(&ctx(dir.path())).unwrap().unwrap();
    assert_eq!(report.events.len(), 3);
    let stop = &report.events[1];
    assert_eq!(stop.context, EventContext::Bootloader);
    assert_eq!(stop.description, Description::Stop);
    assert_eq!(stop.duration_bootloader_init, 15.0);
    assert!(report
        .findings
        .iter()
        .all(|f| f.kind != FindingKind::SlowBootloader));
}

#[test]
fn test_slow_bootloader_and_long_downtime() {
    let dir = snapshot(
        Some(RHEL7),
        Some(
            "May 20 08:00:00 db1 systemd-journald[488]: Journal started\n\
             May 20 10:00:00 db1 systemd-journald[488]: Journal stopped\n\
             May 20 10:20:00 db1 kernel: Command line: BOOT_IMAGE=/vmlinuz ro\n\
             May 20 10:20:45 db1 systemd-journald[90]: Journal stopped\n\
             May 20 10:20:50 db1 systemd-journald[501]: Journal started\n",
        ),
    );
    let result = RebootCheck.run(&ctx(dir.path())).unwrap();
    assert_eq!(result.status, CheckStatus::Failed);
    // first start: hard; bootloader start after the stop: down 1200s;
    // bootloader stop: 45s init; final os start: hard and down 1250s
    assert!(result.text.starts_with("5 problem(s) found\n"));
    assert!(result.text.contains("- bootloader took more than 20s to init (2024-05-20 10:20:45)"));
    assert!(result.text.contains("- system was down for more than 10 minutes (2024-05-20 10:20:50)"));
    assert!(result.text.contains("Events:\nTime"));
}

#[test]
fn test_year_rollover_orders_events() {
    let dir = snapshot(
        Some(RHEL7),
        Some(
            "Dec 31 23:59:00 web1 systemd-journald[488]: Journal stopped\n\
             Jan  1 00:00:30 web1 systemd-journald[490]: Journal started\n",
        ),
    );
    let config = AuditConfig {
        root: dir.path().to_path_buf(),
        ..AuditConfig::default()
    };
    let jan = NaiveDate::from_ymd_opt(2025, 1, 3)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let report = RebootCheck
        .analyze(&CheckContext::new(config, jan))
        .unwrap()
        .unwrap();
    assert_eq!(report.events[0].time.format("%Y").to_string(), "2024");
    assert_eq!(report.events[1].time.format("%Y").to_string(), "2025");
    assert_eq!(report.events[1].duration_down, 90.0);
    assert_eq!(report.events[1].status, RebootStatus::Clean);
}

#[test]
fn test_noise_only_log_is_skipped() {
    let dir = snapshot(
        Some(RHEL7),
        Some(
            "May 20 10:00:00 web1 sshd[1001]: Accepted publickey for root\n\
             May 20 10:05:00 web1 crond[77]: (root) CMD (run-parts /etc/cron.hourly)\n",
        ),
    );
    let result = RebootCheck.run(&ctx(dir.path())).unwrap();
    assert_eq!(result.status, CheckStatus::Skipped);
    assert_eq!(result.text, "No reboot found");
    assert!(!result.text.contains("Events:"));
}

#[test]
fn test_empty_log_is_skipped() {
    let dir = snapshot(Some(RHEL7), Some(""));
    let result = RebootCheck.run(&ctx(dir.path())).unwrap();
    assert_eq!(result.status, CheckStatus::Skipped);
}

#[test]
fn test_unsupported_release_skips_before_log() {
    // no log file at all: it must never be opened
    let dir = snapshot(Some("CentOS Linux release 8.5.2111\n"), None);
    let result = RebootCheck.run(&ctx(dir.path())).unwrap();
    assert_eq!(result.status, CheckStatus::Skipped);
    assert!(result.text.contains("Only works on Red Hat Enterprise Linux 7"));
}

#[test]
fn test_missing_release_skips() {
    let dir = snapshot(None, None);
    let result = RebootCheck.run(&ctx(dir.path())).unwrap();
    assert_eq!(result.status, CheckStatus::Skipped);
    assert_eq!(result.text, "Non Red Hat system, skipping");
}

#[test]
fn test_missing_log_is_fatal() {
    let dir = snapshot(Some(RHEL7), None);
    let err = RebootCheck.run(&ctx(dir.path())).unwrap_err();
    assert!(matches!(err, AuditError::LogUnreadable { .. }));
}

#[test]
fn test_malformed_timestamp_is_fatal() {
    let dir = snapshot(
        Some(RHEL7),
        Some("20240520T100000 web1 systemd-journald[488]: Journal stopped\n"),
    );
    let err = RebootCheck.run(&ctx(dir.path())).unwrap_err();
    assert!(matches!(err, AuditError::MalformedTimestamp { .. }));
}

#[test]
fn test_custom_paths_from_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("os-release"), "my distro 7\n").unwrap();
    fs::write(
        dir.path().join("syslog"),
        "May 20 10:00:00 h systemd-journald[1]: Journal stopped\n\
         May 20 10:00:30 h systemd-journald[2]: Journal started\n",
    )
    .unwrap();
    let mut config = AuditConfig {
        root: dir.path().to_path_buf(),
        ..AuditConfig::default()
    };
    config.reboot.release_file = "os-release".into();
    config.reboot.release_marker = "my distro 7".to_string();
    config.reboot.messages_file = "/syslog".into();
    let result = RebootCheck.run(&CheckContext::new(config, now())).unwrap();
    assert_eq!(result.status, CheckStatus::Ok);
}

#[test]
fn test_out_of_range_skew_is_config_error_not_panic() {
    let dir = snapshot(
        Some(RHEL7),
        Some("May 20 10:00:00 web1 systemd-journald[488]: Journal stopped\n"),
    );
    for skew in [i64::MAX, -3_000_000_000] {
        let mut config = AuditConfig {
            root: dir.path().to_path_buf(),
            ..AuditConfig::default()
        };
        config.reboot.clock_skew_hours = skew;
        let err = RebootCheck
            .run(&CheckContext::new(config, now()))
            .unwrap_err();
        assert!(matches!(err, AuditError::Config(_)), "skew {}", skew);
    }
}

#[test]
fn test_release_path_that_is_a_directory_skips() {
    let dir = snapshot(None, None);
    fs::create_dir_all(dir.path().join("etc/redhat-release")).unwrap();
    let result = RebootCheck.run(&ctx(dir.path())).unwrap();
    assert_eq!(result.status, CheckStatus::Skipped);
    assert_eq!(result.text, "Non Red Hat system, skipping");
}
