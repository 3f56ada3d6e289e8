// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Stored function library

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{CatalogError, CatalogResult};

pub const DEFAULT_LANGUAGE: &str = "sql";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFunction {
    pub name: String,
    pub code: String,
    pub language: String,
    pub parameters: Vec<String>,
    pub idempotent: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionLibrary {
    functions: BTreeMap<String, StoredFunction>,
}

impl FunctionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_function(
        &mut self,
        name: &str,
        code: &str,
        language: Option<&str>,
        parameters: Vec<String>,
        idempotent: bool,
    ) -> CatalogResult<&StoredFunction> {
        let key = name.to_lowercase();
        if key.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "Function name must not be empty".to_string(),
            ));
        }
        if self.functions.contains_key(&key) {
            return Err(CatalogError::already_exists("Function", name));
        }

        let mut seen = Vec::with_capacity(parameters.len());
        for parameter in &parameters {
            if seen.contains(&parameter.to_lowercase()) {
                return Err(CatalogError::InvalidArgument(format!(
                    "Duplicate parameter '{}' in function '{}'",
                    parameter, name
                )));
            }
            seen.push(parameter.to_lowercase());
        }

        let function = StoredFunction {
            name: name.to_string(),
            code: code.to_string(),
            language: language.unwrap_or(DEFAULT_LANGUAGE).to_lowercase(),
            parameters,
            idempotent,
            created_at: Utc::now(),
        };
        log::info!(
            "Creating function '{}' ({}, {} parameters)",
            function.name,
            function.language,
            function.parameters.len()
        );
        Ok(self.functions.entry(key).or_insert(function))
    }

    pub fn get(&self, name: &str) -> Option<&StoredFunction> {
        self.functions.get(&name.to_lowercase())
    }

    pub fn drop_function(&mut self, name: &str) -> bool {
        self.functions.remove(&name.to_lowercase()).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        self.functions.values().map(|f| f.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_function_defaults_language() {
        let mut library = FunctionLibrary::new();
        let function = library
            .create_function("total", "select 1", None, vec!["a".into()], true)
            .unwrap();
        assert_eq!(function.language, "sql");
        assert!(function.idempotent);
        assert!(library.get("TOTAL").is_some());
    }

    #[test]
    fn test_duplicate_function_fails() {
        let mut library = FunctionLibrary::new();
        library.create_function("f", "x", Some("JS"), vec![], false).unwrap();
        assert!(library.create_function("F", "y", None, vec![], false).is_err());
        assert!(library
            .create_function("g", "y", None, vec!["a".into(), "A".into()], false)
            .is_err());
    }
}
