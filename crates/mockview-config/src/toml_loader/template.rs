/// Generate the default TOML config content with comments.
pub(super) fn default_config_toml() -> String {
    r##"# mockview configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[backend]
# user_agent = ""              # empty = engine default
# base_url = "about:blank"     # document URL for inline HTML
# javascript_enabled = true

[runtime]
# recursion_limit = 512        # 16-10000
# stack_size_limit = 10240     # 256-1048576
# loop_iteration_limit = 1000000
# max_timer_runs = 1000        # 1-100000

[logging]
# level = "info"               # trace, debug, info, warn, error
"##
    .to_string()
}
