//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Kiosk Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[supervisor]
# restart_delay_ms = 5000       # 100-600000, fixed delay before relaunching a crashed worker
# worker_binary = "/opt/kiosk/kiosk-worker"
# shutdown_grace_ms = 3000      # 100-60000
# kill_strays_by_name = false   # also kill processes named like the worker on manual exit

[logging]
# level = "INFO"                # TRACE, DEBUG, INFO, WARN, ERROR
# directory = "/var/log/kiosk"
# file_logging = true
# retention_days = 7            # 1-365
# sweep_interval_hours = 24     # 0 = sweep once at startup

[keyboard]
# primary = ["/usr/bin/squeekboard"]
# secondary = "/usr/bin/onboard"

# One [[workers]] table per display.
#
# [[workers]]
# monitor_index = 0
# url = "https://example.com/"
# allow_exit = false
# exit_url = ""                 # blank = same as url
# log_console_messages = false
# dev_tools_on_start = false
#
# [workers.local_storage]
# kioskId = "lobby-1"
"##
}
