use regex::Regex;
use syncline_protocol::{Job, SharedStr};

use crate::error::Result;

const UNKNOWN_NAME: &str = "Unknown Name";

/// Shortens full test names into lane labels.
///
/// Each pattern should carry a `name` capture group; the first pattern that
/// matches wins.
#[derive(Debug, Clone, Default)]
pub struct JobNamer {
    patterns: Vec<Regex>,
}

impl JobNamer {
    /// Compile every pattern up front so a bad one fails at startup.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn short_name(&self, test_name: &str) -> String {
        if test_name.is_empty() {
            return UNKNOWN_NAME.to_string();
        }
        self.patterns
            .iter()
            .find_map(|re| re.captures(test_name)?.name("name"))
            .map_or_else(|| test_name.to_string(), |m| m.as_str().to_string())
    }

    pub fn job(&self, job_id: impl Into<SharedStr>, test_name: &str) -> Job {
        Job {
            job_id: job_id.into(),
            short_name: self.short_name(test_name),
        }
    }
}
