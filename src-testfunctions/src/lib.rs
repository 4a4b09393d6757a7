//! Optimization test functions library
//!
//! Benchmark objectives used to exercise the swarm optimizer, organized by
//! category:
//!
//! - **Unimodal**: single global optimum (sphere, rosenbrock, ...)
//! - **Multimodal**: many local minima (ackley, rastrigin, ...)
//!
//! Every function maps one point `&Array1<f64>` to its cost. Metadata gives
//! the usual search box and the known global minima.
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use swarmopt_testfunctions::*;
//!
//! let x = Array1::from_vec(vec![0.0, 0.0]);
//! assert_eq!(sphere(&x), 0.0);
//!
//! let bounds = get_function_bounds("sphere").unwrap();
//! assert_eq!(bounds.len(), 2);
//! ```

use ndarray::Array1;
use std::collections::HashMap;

pub mod functions;
pub use functions::*;

/// Signature shared by all test functions.
pub type TestFunction = fn(&Array1<f64>) -> f64;

/// Metadata for a test function
#[derive(Debug, Clone)]
pub struct FunctionMetadata {
    /// Function name
    pub name: String,
    /// Bounds for each dimension (min, max)
    pub bounds: Vec<(f64, f64)>,
    /// Global minima locations and values
    pub global_minima: Vec<(Vec<f64>, f64)>,
    /// Description of the function
    pub description: String,
    /// Whether the function is multimodal
    pub multimodal: bool,
    /// Dimensions the function accepts; `None` means any dimension
    pub fixed_dimension: Option<usize>,
}

fn meta(
    name: &str,
    bound: (f64, f64),
    minimum: f64,
    at: f64,
    description: &str,
    multimodal: bool,
    fixed_dimension: Option<usize>,
) -> FunctionMetadata {
    FunctionMetadata {
        name: name.to_string(),
        bounds: vec![bound; 2],
        global_minima: vec![(vec![at; 2], minimum)],
        description: description.to_string(),
        multimodal,
        fixed_dimension,
    }
}

/// Get metadata for all available test functions
pub fn get_function_metadata() -> HashMap<String, FunctionMetadata> {
    let mut metadata = HashMap::new();
    let mut add = |m: FunctionMetadata| {
        metadata.insert(m.name.clone(), m);
    };

    add(meta("sphere", (-5.12, 5.12), 0.0, 0.0, "Convex bowl, N-dimensional", false, None));
    add(meta("quadratic", (-5.0, 5.0), 0.0, 1.0, "Shifted convex bowl, N-dimensional", false, None));
    add(meta(
        "rosenbrock",
        (-2.048, 2.048),
        0.0,
        1.0,
        "Curved narrow valley, N-dimensional",
        false,
        None,
    ));
    add(meta("matyas", (-10.0, 10.0), 0.0, 0.0, "Plate-shaped 2D function", false, Some(2)));
    add(meta("rastrigin", (-5.12, 5.12), 0.0, 0.0, "Regular grid of local minima", true, None));
    add(meta("ackley", (-32.768, 32.768), 0.0, 0.0, "Nearly flat outer region", true, None));
    add(meta("griewank", (-600.0, 600.0), 0.0, 0.0, "Product-coupled ripples", true, None));
    add(meta("levi13", (-10.0, 10.0), 0.0, 1.0, "2D function with ridged landscape", true, Some(2)));

    let mut booth = meta("booth", (-10.0, 10.0), 0.0, 0.0, "2D quadratic plate", false, Some(2));
    booth.global_minima = vec![(vec![1.0, 3.0], 0.0)];
    add(booth);

    let mut himmelblau = meta("himmelblau", (-5.0, 5.0), 0.0, 0.0, "2D with four minima", true, Some(2));
    himmelblau.global_minima = vec![
        (vec![3.0, 2.0], 0.0),
        (vec![-2.805118, 3.131312], 0.0),
        (vec![-3.779310, -3.283186], 0.0),
        (vec![3.584428, -1.848126], 0.0),
    ];
    add(himmelblau);

    metadata
}

/// Look a test function up by name.
pub fn get_function(name: &str) -> Option<TestFunction> {
    let f: TestFunction = match name {
        "sphere" => sphere,
        "quadratic" => quadratic,
        "rosenbrock" => rosenbrock,
        "booth" => booth,
        "matyas" => matyas,
        "rastrigin" => rastrigin,
        "ackley" => ackley,
        "griewank" => griewank,
        "levi13" => levi13,
        "himmelblau" => himmelblau,
        _ => return None,
    };
    Some(f)
}

/// Helper function to get bounds for a specific function from metadata
/// Returns None if function is not found in metadata
pub fn get_function_bounds(function_name: &str) -> Option<Vec<(f64, f64)>> {
    let metadata = get_function_metadata();
    metadata.get(function_name).map(|meta| meta.bounds.clone())
}

/// Bounds for `dims` dimensions, repeating the per-axis metadata bound.
/// Returns `default_bounds` on every axis if the function is unknown.
pub fn get_function_bounds_vec(
    function_name: &str,
    dims: usize,
    default_bounds: (f64, f64),
) -> Vec<(f64, f64)> {
    match get_function_bounds(function_name) {
        Some(bounds) if !bounds.is_empty() => vec![bounds[0]; dims],
        _ => vec![default_bounds; dims],
    }
}
