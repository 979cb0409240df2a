//! `clashtb eval`: evaluate a function once.

use clashtb_bench::Function;
use clashtb_common::Value;

use crate::setup::{load_config, start_simulator};
use crate::{EvalArgs, GlobalArgs};

/// Runs the `clashtb eval` command and prints the result.
pub fn run(args: &EvalArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let function = Function::new(&args.design, args.function.as_str())?;
    let values = parse_args(&args.args);

    let mut sim = start_simulator(&config, global)?;
    let result = function.test(&mut sim, &values)?;
    sim.terminate();

    println!("{result}");
    Ok(0)
}

fn parse_args(args: &[String]) -> Vec<Value> {
    args.iter().map(|a| Value::parse(a)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_become_values() {
        let args = vec!["3".to_string(), "-2".to_string(), "Idle".to_string()];
        assert_eq!(
            parse_args(&args),
            vec![Value::Int(3), Value::Int(-2), Value::from("Idle")]
        );
    }
}
