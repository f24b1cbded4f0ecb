use std::collections::HashSet;

use crate::error::ConfigError;

/// Pure input for one run: which local paths to push, and where.
///
/// Both sides are sets: repeating a path or destination on the command
/// line must not push anything twice. Building a task list walks
/// `|locals| x |remotes|` combinations; the config itself performs no IO.
#[derive(Debug, Default, Clone)]
pub struct Config {
    pub locals: Vec<String>,
    pub remotes: Vec<String>,
}

fn dedupe(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(v.clone())).collect()
}

impl Config {
    pub fn new(locals: Vec<String>, remotes: Vec<String>) -> Self {
        Self { locals: dedupe(locals), remotes: dedupe(remotes) }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.locals.is_empty() {
            return Err(ConfigError::NoLocals);
        }
        if self.remotes.is_empty() {
            return Err(ConfigError::NoRemotes);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_entries_collapse_keeping_first_order() {
        let c = Config::new(
            vec!["b".into(), "a".into(), "b".into()],
            vec!["s3://x/p".into(), "s3://x/p".into(), "s3://y".into()],
        );
        assert_eq!(c.locals, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(c.remotes, vec!["s3://x/p".to_string(), "s3://y".to_string()]);
    }

    #[test]
    fn validate_rejects_empty_sides() {
        assert!(Config::new(vec![], vec!["s3://b".into()]).validate().is_err());
        assert!(Config::new(vec!["a".into()], vec![]).validate().is_err());
        assert!(Config::new(vec!["a".into()], vec!["s3://b".into()]).validate().is_ok());
    }
}
