/// Registry of the benchmark objectives the `run_pso` binary can optimize
use std::collections::HashMap;

use swarmopt_testfunctions::{FunctionMetadata, TestFunction, get_function, get_function_metadata};

/// Function registry mapping names to function pointers and metadata.
pub struct FunctionRegistry {
    functions: HashMap<String, (TestFunction, FunctionMetadata)>,
}

impl FunctionRegistry {
    /// Creates a registry with every function that has metadata.
    pub fn new() -> Self {
        let functions = get_function_metadata()
            .into_iter()
            .filter_map(|(name, meta)| get_function(&name).map(|f| (name, (f, meta))))
            .collect();
        Self { functions }
    }

    pub fn get(&self, name: &str) -> Option<TestFunction> {
        self.functions.get(name).map(|(f, _)| *f)
    }

    pub fn metadata(&self, name: &str) -> Option<&FunctionMetadata> {
        self.functions.get(name).map(|(_, m)| m)
    }

    /// Sorted function names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Search box for `dims` dimensions, repeating the per-axis bound.
    ///
    /// `None` if the function is unknown or only defined for another
    /// dimension.
    pub fn bounds(&self, name: &str, dims: usize) -> Option<Vec<(f64, f64)>> {
        let meta = self.metadata(name)?;
        if meta.fixed_dimension.is_some_and(|d| d != dims) {
            return None;
        }
        let axis = *meta.bounds.first()?;
        Some(vec![axis; dims])
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    #[test]
    fn test_registry_lookup() {
        let registry = FunctionRegistry::new();
        let names = registry.names();
        assert!(names.contains(&"sphere"));
        assert!(names.contains(&"rastrigin"));
        assert!(names.windows(2).all(|w| w[0] < w[1]));

        let sphere = registry.get("sphere").unwrap();
        assert_eq!(sphere(&Array1::from_vec(vec![1.0, 2.0])), 5.0);
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_registry_bounds() {
        let registry = FunctionRegistry::default();
        let b = registry.bounds("sphere", 4).unwrap();
        assert_eq!(b.len(), 4);
        assert_eq!(b[3], (-5.12, 5.12));
        // himmelblau is two-dimensional only
        assert!(registry.bounds("himmelblau", 3).is_none());
        assert!(registry.bounds("himmelblau", 2).is_some());
    }
}
