//! The smoke script's entities written directly in Rust.

use crate::ProgramError;
use std::io::Write;

/// Largest `n` whose factorial fits in an `i64`.
const MAX_EXACT_FACTORIAL: i64 = 20;

/// `n!`, with every `n <= 1` (negatives included) giving 1.
///
/// `None` when the result does not fit in an `i64`.
pub fn factorial(n: i64) -> Option<i64> {
    if n <= 1 {
        return Some(1);
    }
    if n > MAX_EXACT_FACTORIAL {
        return None;
    }
    n.checked_mul(factorial(n - 1)?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub age: i64,
}

impl Person {
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }

    pub fn greet(&self) -> String {
        format!("Hello, my name is {}", self.name)
    }
}

/// Print 0 through 4 with a counting loop.
pub fn counting_loop(out: &mut impl Write) -> std::io::Result<()> {
    for i in 0..5 {
        writeln!(out, "{}", i)?;
    }
    Ok(())
}

/// Print a counter while it stays below 5.
pub fn condition_loop(out: &mut impl Write) -> std::io::Result<()> {
    let mut count = 0;
    while count < 5 {
        writeln!(out, "{}", count)?;
        count += 1;
    }
    Ok(())
}

/// Produce the smoke script's output without going through the evaluator.
pub fn run_demo(out: &mut impl Write) -> Result<(), ProgramError> {
    tracing::debug!("running native demo");
    let result = factorial(5).ok_or(ProgramError::Overflow(5))?;
    writeln!(out, "Factorial of 5 is: {}", result)?;

    let john = Person::new("John", 30);
    writeln!(out, "{}", john.greet())?;

    counting_loop(out)?;
    condition_loop(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factorial_base_cases() {
        assert_eq!(factorial(0), Some(1));
        assert_eq!(factorial(1), Some(1));
        assert_eq!(factorial(-3), Some(1));
        assert_eq!(factorial(i64::MIN), Some(1));
    }

    #[test]
    fn test_factorial_recurrence() {
        assert_eq!(factorial(5), Some(120));
        for n in 2..=MAX_EXACT_FACTORIAL {
            assert_eq!(factorial(n), factorial(n - 1).map(|f| f * n));
        }
        assert_eq!(factorial(20), Some(2_432_902_008_176_640_000));
    }

    #[test]
    fn test_factorial_overflow() {
        assert_eq!(factorial(21), None);
        assert_eq!(factorial(i64::MAX), None);
    }

    #[test]
    fn test_person() {
        let john = Person::new("John", 30);
        assert_eq!(john.greet(), "Hello, my name is John");
        assert_eq!(john.age, 30);
        assert_eq!(Person::new("", -1).greet(), "Hello, my name is ");
    }

    #[test]
    fn test_loops() {
        let mut counting = Vec::new();
        counting_loop(&mut counting).unwrap();
        let mut condition = Vec::new();
        condition_loop(&mut condition).unwrap();
        assert_eq!(counting, b"0\n1\n2\n3\n4\n");
        assert_eq!(counting, condition);
    }
}
