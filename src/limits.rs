//! Limits and constraints for catalogue processing
//!
//! Community catalogue files are fetched from a remote repository, so the
//! parser bounds document size, nesting depth and element count to protect
//! against oversized or maliciously nested XML.

use crate::error::{Error, Result};

/// Limits applied while building the document tree
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum element nesting depth
    pub max_xml_depth: usize,

    /// Maximum XML input size in bytes
    pub max_xml_size: usize,

    /// Maximum number of elements in one document
    pub max_elements: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 200,
            // The largest BSData catalogues are a few MB; 64 MB is far beyond
            // anything a legitimate .cat file reaches.
            max_xml_size: 64 * 1024 * 1024,
            max_elements: 2_000_000,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_xml_depth: 50,
            max_xml_size: 8 * 1024 * 1024,
            max_elements: 200_000,
        }
    }

    /// Check if element depth is within limits
    pub fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_xml_depth {
            Err(Error::LimitExceeded(format!(
                "XML depth {} exceeds maximum {}",
                depth, self.max_xml_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if input size is within limits
    pub fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_xml_size {
            Err(Error::LimitExceeded(format!(
                "XML size {} bytes exceeds maximum {} bytes",
                size, self.max_xml_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if element count is within limits
    pub fn check_elements(&self, count: usize) -> Result<()> {
        if count > self.max_elements {
            Err(Error::LimitExceeded(format!(
                "element count {} exceeds maximum {}",
                count, self.max_elements
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert!(limits.check_depth(100).is_ok());
        assert!(limits.check_depth(500).is_err());
    }

    #[test]
    fn test_strict_limits() {
        let limits = Limits::strict();
        assert!(limits.max_xml_depth < Limits::default().max_xml_depth);
        assert!(limits.check_depth(60).is_err());
    }

    #[test]
    fn test_check_size() {
        let limits = Limits::default();
        assert!(limits.check_size(1024).is_ok());
        assert!(limits.check_size(100 * 1024 * 1024).is_err());
    }
}
