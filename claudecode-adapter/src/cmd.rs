//! Argument list for a single print-mode run.

use crate::types::{BuiltinToolSet, OutputFormat, RunConfig};
use std::ffi::OsString;

/// Builds the argument list for a `claude --print` invocation from the given
/// prompt and configuration. The prompt is always the last argument.
#[must_use]
pub fn build_args(prompt: &str, config: &RunConfig) -> Vec<OsString> {
    let mut args = vec![OsString::from("--print")];

    if let Some(ref model) = config.model {
        args.push(OsString::from("--model"));
        args.push(OsString::from(model));
    }

    if config.output_format == OutputFormat::Json {
        args.push(OsString::from("--output-format"));
        args.push(OsString::from("json"));
    }

    if let BuiltinToolSet::Explicit(tools) = &config.tools.builtin {
        args.push(OsString::from("--tools"));
        args.push(OsString::from(tools.join(",")));
    }

    if let Some(allowed) = &config.tools.allowed {
        args.push(OsString::from("--allowed-tools"));
        args.push(OsString::from(allowed.join(",")));
    }

    if config.tools.disable_slash_commands {
        args.push(OsString::from("--disable-slash-commands"));
    }

    for dir in &config.add_dirs {
        args.push(OsString::from("--add-dir"));
        args.push(dir.clone().into_os_string());
    }

    if config.no_session_persistence {
        args.push(OsString::from("--no-session-persistence"));
    }

    if let Some(ref sources) = config.setting_sources {
        args.push(OsString::from("--setting-sources"));
        args.push(OsString::from(sources));
    }

    args.push(OsString::from(prompt));

    args
}
