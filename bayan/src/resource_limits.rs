/// Resource limits to prevent abuse and enable predictable memory usage
///
/// Parsing limits are always enforced. The search limits are off by default:
/// resolution is depth-first and a left-recursive program is allowed to run
/// forever unless the host opts into a budget.
#[derive(Debug, Clone)]
pub struct ResourceLimits {
    /// Maximum file size in bytes
    /// Real usage: ~5KB, Limit: 5MB (1000x)
    pub max_file_size_bytes: usize,

    /// Maximum nesting depth of terms and arithmetic expressions
    /// Real usage: ~3 levels, Limit: 100 (30x+)
    pub max_term_depth: usize,

    /// Maximum length of a list built by `length/2` or `append/3`
    /// Real usage: ~100 items, Limit: 1M (10000x)
    pub max_list_length: usize,

    /// Maximum number of resolution steps for a single query
    /// None means unbounded
    pub max_inferences: Option<u64>,

    /// Maximum wall-clock time for a single query in milliseconds
    /// None means unbounded
    pub max_query_time_ms: Option<u64>,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 5 * 1024 * 1024, // 5 MB
            max_term_depth: 100,
            max_list_length: 1_000_000,
            max_inferences: None,
            max_query_time_ms: None,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits suitable for untrusted input, such as requests to the HTTP server
    pub fn sandboxed() -> Self {
        Self {
            max_list_length: 100_000,
            max_inferences: Some(1_000_000),
            max_query_time_ms: Some(1000),
            ..Self::default()
        }
    }
}
