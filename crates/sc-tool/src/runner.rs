use std::path::Path;

use sc_assert::build;
use sc_core::{ScenarioError, Value};
use sc_template::{execute_value, Context};

use crate::source::read_test_case;
use crate::{ScToolError, TestCase, TestStep};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop at the first failing step instead of running the rest.
    pub fail_fast: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub name: String,
    /// The executed `value`, when its template could be executed.
    pub value: Option<Value>,
    pub error: Option<ScenarioError>,
}

impl StepReport {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub title: Option<String>,
    pub steps: Vec<StepReport>,
    pub total_steps: usize,
}

impl RunReport {
    /// True when every step of the case ran and passed.
    pub fn passed(&self) -> bool {
        self.steps.len() == self.total_steps && self.steps.iter().all(StepReport::passed)
    }

    pub fn first_failure(&self) -> Option<&StepReport> {
        self.steps.iter().find(|step| !step.passed())
    }
}

/// Runs every step of `case` against a context of `{vars, steps}`, where
/// `steps` holds the values of the steps run so far.
pub fn run_case(case: &TestCase, options: &RunOptions) -> RunReport {
    let vars = Value::from(case.vars.clone());
    let mut previous = Vec::with_capacity(case.steps.len());
    let mut steps = Vec::with_capacity(case.steps.len());

    for (index, step) in case.steps.iter().enumerate() {
        let name = step.label(index);
        let context = Context::new(Value::map([
            ("vars", vars.clone()),
            ("steps", Value::Seq(previous.clone())),
        ]));
        let (value, error) = run_step(step, &context);
        match &error {
            None => tracing::debug!(step = %name, "step passed"),
            Some(error) => tracing::debug!(step = %name, error = %error, "step failed"),
        }
        previous.push(value.clone().unwrap_or(Value::Nil));
        let failed = error.is_some();
        steps.push(StepReport { name, value, error });
        if failed && options.fail_fast {
            break;
        }
    }

    RunReport {
        title: case.title.clone(),
        steps,
        total_steps: case.steps.len(),
    }
}

fn run_step(step: &TestStep, context: &Context) -> (Option<Value>, Option<ScenarioError>) {
    let value = match execute_value(&Value::from(step.value.clone()), context) {
        Ok(value) => value,
        Err(error) => return (None, Some(error)),
    };
    let outcome = execute_value(&Value::from(step.expect.clone()), context)
        .and_then(|expect| build(&expect).assert(&value));
    (Some(value), outcome.err())
}

/// Reads and runs the case at `case_path`, failing on its first failed step.
pub fn assert_case(case_path: &Path, options: &RunOptions) -> Result<RunReport, ScToolError> {
    let case = read_test_case(case_path)?;
    tracing::info!(
        case = %case_path.display(),
        title = case.title.as_deref().unwrap_or(""),
        steps = case.steps.len(),
        "running case"
    );
    let report = run_case(&case, options);
    let failure = report
        .steps
        .iter()
        .find_map(|step| step.error.as_ref().map(|error| (step, error)));
    if let Some((failed, error)) = failure {
        return Err(ScToolError::StepFailed {
            case: case_path.to_path_buf(),
            step: failed.name.clone(),
            source: error.clone(),
        });
    }
    Ok(report)
}
