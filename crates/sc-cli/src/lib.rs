use std::ffi::OsString;
use std::fs;
use std::path::Path;

use clap::Parser;
use sc_core::{ScenarioError, Value};
use sc_template::{Context, Template};
use sc_tool::{assert_case, discover_cases, RunOptions};

mod cli_args;
mod error_map;

pub(crate) use cli_args::{Cli, Mode, RenderArgs, RunArgs};
pub(crate) use error_map::{
    emit_error, map_cli_value_json, map_cli_vars_invalid, map_cli_vars_read, map_tool_error,
};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            if let Err(io_error) = error.print() {
                tracing::warn!(error = %io_error, "failed to print usage");
            }
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, ScenarioError> {
    match cli.command {
        Mode::Render(args) => run_render(args),
        Mode::Run(args) => run_cases(args),
    }
}

fn load_vars(path: Option<&str>) -> Result<Value, ScenarioError> {
    let Some(path) = path else {
        return Ok(Value::Map(Vec::new()));
    };
    let raw = fs::read_to_string(path).map_err(map_cli_vars_read)?;
    let json = serde_json::from_str::<serde_json::Value>(&raw).map_err(map_cli_vars_invalid)?;
    Ok(Value::from(json))
}

fn run_render(args: RenderArgs) -> Result<i32, ScenarioError> {
    let vars = load_vars(args.vars.as_deref())?;
    let template = Template::parse(&args.template)?;
    let context = Context::new(Value::map([("vars", vars)]));
    let value = template.execute(&context)?;
    let json = serde_json::to_string(&value).map_err(map_cli_value_json)?;

    println!("RESULT:OK");
    println!("VALUE_JSON:{}", json);
    Ok(0)
}

fn run_cases(args: RunArgs) -> Result<i32, ScenarioError> {
    let options = RunOptions {
        fail_fast: args.fail_fast,
    };
    let cases = discover_cases(Path::new(&args.cases_dir)).map_err(map_tool_error)?;

    let mut failed = 0usize;
    for case_path in &cases {
        match assert_case(case_path, &options) {
            Ok(_) => println!("CASE:{}:OK", case_path.display()),
            Err(error) => {
                failed += 1;
                tracing::warn!(case = %case_path.display(), error = %error, "case failed");
                println!("CASE:{}:FAILED:{}", case_path.display(), error);
                if options.fail_fast {
                    break;
                }
            }
        }
    }

    if failed > 0 {
        return Err(ScenarioError::new(
            "CLI_CASES_FAILED",
            format!("{} of {} case(s) failed.", failed, cases.len()),
        ));
    }
    println!("RESULT:OK");
    Ok(0)
}

#[cfg(test)]
mod tests;
