//! Structured telemetry pipeline for scoring-rule violations.
//!
//! This module provides an observable system for tracking rule violations
//! and internal invariant failures. Instead of just logging with `tracing::warn!`,
//! violations are structured data that can be:
//!
//! - Logged via tracing (default behavior, backward compatible)
//! - Collected programmatically for testing
//! - Sent to custom observers (metrics, alerting, etc.)
//!
//! The most common producer is manual runner placement: dropping a runner on
//! an occupied base overwrites the occupant (last write wins), and the
//! overwrite is reported here as a [`ViolationKind::BaseOccupancy`] warning
//! so tests and callers can observe the discarded runner.
//!
//! # Example
//!
//! ```
//! use scorebook::telemetry::{ViolationSeverity, ViolationKind, CollectingObserver};
//! use std::sync::Arc;
//!
//! // Create a collecting observer for tests
//! let observer = Arc::new(CollectingObserver::new());
//!
//! // Check violations after some operations
//! assert!(observer.violations().is_empty(), "unexpected violations");
//! ```

use crate::Inning;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Severity of a rule violation.
///
/// Severities are ordered from least to most severe, allowing filtering
/// and comparison operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    /// Noteworthy but expected - recorded for visibility only.
    ///
    /// Example: A no-op adjustment command addressing an empty base.
    Info,
    /// Unexpected but recoverable - operation continued with fallback.
    ///
    /// Example: A runner placed on an occupied base, discarding the occupant.
    Warning,
    /// Serious issue - operation may have degraded behavior.
    ///
    /// Example: A published document that could not be decoded.
    Error,
    /// Critical invariant broken - state may be corrupted.
    ///
    /// Example: The same runner standing on two bases at once.
    Critical,
}

impl ViolationSeverity {
    /// Returns a string representation suitable for logging/metrics labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for ViolationSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories of rule violations.
///
/// Each category corresponds to a major subsystem of the library,
/// making it easy to filter and route violations.
///
/// # Forward Compatibility
///
/// This enum is marked `#[non_exhaustive]` because new violation categories
/// may be added in future versions. Always include a wildcard arm when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ViolationKind {
    /// Base occupancy invariant violated.
    ///
    /// Examples:
    /// - A runner placed on a base that already held a runner (occupant
    ///   discarded, last write wins)
    /// - The same runner identity found on two bases
    BaseOccupancy,
    /// Play sequencing invariant violated.
    ///
    /// Examples:
    /// - A commit observed with outs already at three
    /// - An undo that restored an inconsistent out count
    PlaySequence,
    /// Half-inning machine invariant violated.
    ///
    /// Examples:
    /// - A retired side carrying base runners forward
    /// - An inning that went backwards without an undo
    HalfInning,
    /// Batting order invariant violated.
    ///
    /// Examples:
    /// - Batter slot out of range for the order length
    /// - Duplicate player identities in the order
    Lineup,
    /// Synchronization contract issues.
    ///
    /// Examples:
    /// - A subscription callback observing undecodable data
    /// - A publish racing a reset
    Synchronization,
    /// Internal logic error (should never happen).
    ///
    /// These violations indicate bugs in the library itself, including
    /// runtime invariant checks that failed in debug or `paranoid` builds.
    Internal,
}

impl ViolationKind {
    /// Returns a string representation suitable for logging/metrics labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BaseOccupancy => "base_occupancy",
            Self::PlaySequence => "play_sequence",
            Self::HalfInning => "half_inning",
            Self::Lineup => "lineup",
            Self::Synchronization => "synchronization",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded rule violation.
///
/// Contains all relevant context for diagnosing and responding to
/// a violation of expected behavior or invariants.
///
/// # Serialization
///
/// This type implements `serde::Serialize` for structured JSON output.
/// The inning field is serialized as `null` when not set, or as an integer.
///
/// # Example
///
/// ```
/// use scorebook::telemetry::{RuleViolation, ViolationSeverity, ViolationKind};
/// use scorebook::Inning;
///
/// let violation = RuleViolation::new(
///     ViolationSeverity::Warning,
///     ViolationKind::BaseOccupancy,
///     "runner overwritten",
///     "pending.rs:42",
/// ).with_inning(Inning::new(5))
///  .with_context("base", "second")
///  .with_context("displaced", "ana");
///
/// assert_eq!(violation.inning, Some(Inning::new(5)));
/// assert_eq!(violation.context.get("base"), Some(&"second".to_string()));
/// ```
#[derive(Debug, Clone, serde::Serialize)]
pub struct RuleViolation {
    /// The severity level of this violation.
    pub severity: ViolationSeverity,
    /// The category/subsystem where the violation occurred.
    pub kind: ViolationKind,
    /// Human-readable description of what went wrong.
    pub message: String,
    /// Source location where the violation was detected (file:line).
    pub location: &'static str,
    /// The inning in which the violation occurred, if applicable.
    pub inning: Option<Inning>,
    /// Additional structured context as key-value pairs.
    ///
    /// This can include values like base names, displaced runner identities,
    /// expected vs actual values, or other diagnostic information.
    pub context: BTreeMap<String, String>,
}

impl RuleViolation {
    /// Creates a new rule violation.
    #[must_use]
    pub fn new(
        severity: ViolationSeverity,
        kind: ViolationKind,
        message: impl Into<String>,
        location: &'static str,
    ) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            location,
            inning: None,
            context: BTreeMap::new(),
        }
    }

    /// Sets the inning in which this violation occurred.
    #[must_use]
    pub fn with_inning(mut self, inning: Inning) -> Self {
        self.inning = Some(inning);
        self
    }

    /// Adds a context key-value pair.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Serializes this violation to a JSON string.
    ///
    /// This is a convenience method for programmatic access to violation data.
    /// Returns `None` if serialization fails (which should not happen for
    /// well-formed violations).
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    /// Serializes this violation to a pretty-printed JSON string.
    ///
    /// Like [`to_json`](Self::to_json), but with indentation for readability.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json_pretty(&self) -> Option<String> {
        serde_json::to_string_pretty(self).ok()
    }
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}/{}] {} (at {}",
            self.severity, self.kind, self.message, self.location
        )?;
        if let Some(inning) = self.inning {
            write!(f, ", inning={inning}")?;
        }
        if !self.context.is_empty() {
            write!(f, ", context={:?}", self.context)?;
        }
        write!(f, ")")
    }
}

/// Trait for observing rule violations.
///
/// Implement this trait to create custom observers that can react to
/// violations in various ways (logging, metrics, alerting, etc.).
///
/// # Thread Safety
///
/// When the `sync-send` feature is enabled, observers must be `Send + Sync`
/// to allow sharing across threads.
///
/// # Example
///
/// ```
/// use scorebook::telemetry::{ViolationObserver, RuleViolation};
///
/// struct MetricsObserver {
///     // Your metrics implementation
/// }
///
/// impl ViolationObserver for MetricsObserver {
///     fn on_violation(&self, violation: &RuleViolation) {
///         // Increment a counter, send to monitoring system, etc.
///         println!("Violation: {}", violation);
///     }
/// }
/// ```
#[cfg(feature = "sync-send")]
pub trait ViolationObserver: Send + Sync {
    /// Called when a rule violation is detected.
    ///
    /// This method should be relatively quick to execute, as it may be
    /// called during interactive scoring operations.
    fn on_violation(&self, violation: &RuleViolation);
}

#[cfg(not(feature = "sync-send"))]
/// Trait for observing rule violations.
///
/// Implement this trait to create custom observers that can react to
/// violations in various ways (logging, metrics, alerting, etc.).
pub trait ViolationObserver {
    /// Called when a rule violation is detected.
    fn on_violation(&self, violation: &RuleViolation);
}

/// Built-in observer that logs violations via the `tracing` crate.
///
/// This is the default observer: sessions without a configured observer
/// route every violation here, so nothing is silently dropped.
///
/// # Log Levels
///
/// - `Info` severity → `tracing::info!`
/// - `Warning` severity → `tracing::warn!`
/// - `Error` severity → `tracing::error!`
/// - `Critical` severity → `tracing::error!` with additional context
///
/// # Structured Output
///
/// All fields are output as structured tracing fields:
/// - `severity` - The severity level as a string (`info`, `warning`, ...)
/// - `kind` - The violation category as a string (e.g., `base_occupancy`)
/// - `location` - Source file and line number where the violation was detected
/// - `inning` - The inning number as an integer, or "null" if not applicable
/// - `context` - A compact representation of context key-value pairs
///
/// This structured output is compatible with JSON logging formatters
/// (like `tracing-subscriber`'s JSON layer) and log aggregation systems.
#[derive(Debug, Default, Clone)]
pub struct TracingObserver;

impl TracingObserver {
    /// Creates a new tracing observer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Formats the inning as a displayable value.
    /// Returns the inning number, or "null" when not set.
    fn format_inning(inning: Option<Inning>) -> String {
        match inning {
            None => "null".to_string(),
            Some(i) => i.as_u32().to_string(),
        }
    }
}

impl ViolationObserver for TracingObserver {
    fn on_violation(&self, violation: &RuleViolation) {
        let severity = violation.severity.as_str();
        let kind = violation.kind.as_str();
        let location = violation.location;
        let inning_str = Self::format_inning(violation.inning);

        // Format context as a compact key=value string for compatibility
        // with systems that don't support dynamic field expansion
        let context_str = if violation.context.is_empty() {
            "{}".to_string()
        } else {
            let pairs: Vec<String> = violation
                .context
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            format!("{{{}}}", pairs.join(", "))
        };

        match violation.severity {
            ViolationSeverity::Info => {
                tracing::info!(
                    severity,
                    kind,
                    location,
                    inning = %inning_str,
                    context = %context_str,
                    "{}",
                    violation.message
                );
            },
            ViolationSeverity::Warning => {
                tracing::warn!(
                    severity,
                    kind,
                    location,
                    inning = %inning_str,
                    context = %context_str,
                    "{}",
                    violation.message
                );
            },
            ViolationSeverity::Error => {
                tracing::error!(
                    severity,
                    kind,
                    location,
                    inning = %inning_str,
                    context = %context_str,
                    "{}",
                    violation.message
                );
            },
            ViolationSeverity::Critical => {
                tracing::error!(
                    severity = "critical",
                    kind,
                    location,
                    inning = %inning_str,
                    context = %context_str,
                    "{}",
                    violation.message
                );
            },
        }
    }
}

/// Built-in observer that collects violations for testing.
///
/// This observer stores all violations in a thread-safe vector,
/// allowing tests to assert on the violations that occurred during
/// an operation.
///
/// # Example
///
/// ```
/// use scorebook::telemetry::{CollectingObserver, ViolationKind, ViolationObserver, RuleViolation, ViolationSeverity};
///
/// let observer = CollectingObserver::new();
///
/// // Simulate a violation being reported
/// observer.on_violation(&RuleViolation::new(
///     ViolationSeverity::Warning,
///     ViolationKind::BaseOccupancy,
///     "test violation",
///     "test.rs:1",
/// ));
///
/// // Check that the violation was collected
/// assert_eq!(observer.violations().len(), 1);
/// assert!(observer.has_violation(ViolationKind::BaseOccupancy));
/// ```
#[derive(Debug, Default)]
pub struct CollectingObserver {
    violations: Mutex<Vec<RuleViolation>>,
}

impl CollectingObserver {
    /// Creates a new collecting observer with an empty violation list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            violations: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of all collected violations.
    #[must_use]
    pub fn violations(&self) -> Vec<RuleViolation> {
        self.violations.lock().clone()
    }

    /// Returns the number of collected violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.lock().len()
    }

    /// Returns true if no violations have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.lock().is_empty()
    }

    /// Checks if any violation of the specified kind has been collected.
    #[must_use]
    pub fn has_violation(&self, kind: ViolationKind) -> bool {
        self.violations.lock().iter().any(|v| v.kind == kind)
    }

    /// Checks if any violation with the specified severity has been collected.
    #[must_use]
    pub fn has_severity(&self, severity: ViolationSeverity) -> bool {
        self.violations
            .lock()
            .iter()
            .any(|v| v.severity == severity)
    }

    /// Returns all violations matching the specified kind.
    #[must_use]
    pub fn violations_of_kind(&self, kind: ViolationKind) -> Vec<RuleViolation> {
        self.violations
            .lock()
            .iter()
            .filter(|v| v.kind == kind)
            .cloned()
            .collect()
    }

    /// Returns all violations at or above the specified severity.
    #[must_use]
    pub fn violations_at_severity(&self, min_severity: ViolationSeverity) -> Vec<RuleViolation> {
        self.violations
            .lock()
            .iter()
            .filter(|v| v.severity >= min_severity)
            .cloned()
            .collect()
    }

    /// Clears all collected violations.
    pub fn clear(&self) {
        self.violations.lock().clear();
    }
}

impl ViolationObserver for CollectingObserver {
    fn on_violation(&self, violation: &RuleViolation) {
        self.violations.lock().push(violation.clone());
    }
}

/// A composite observer that forwards violations to multiple observers.
///
/// Useful when you want to both log violations and collect them for testing,
/// or when you have multiple monitoring systems.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ViolationObserver>>,
}

impl CompositeObserver {
    /// Creates a new composite observer with no child observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Adds an observer to the composite.
    pub fn add(&mut self, observer: Arc<dyn ViolationObserver>) {
        self.observers.push(observer);
    }

    /// Creates a composite observer from a list of observers.
    #[must_use]
    pub fn from_observers(observers: Vec<Arc<dyn ViolationObserver>>) -> Self {
        Self { observers }
    }
}

impl ViolationObserver for CompositeObserver {
    fn on_violation(&self, violation: &RuleViolation) {
        for observer in &self.observers {
            observer.on_violation(violation);
        }
    }
}

impl std::fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("num_observers", &self.observers.len())
            .finish()
    }
}

/// Macro for reporting rule violations with location tracking.
///
/// This macro creates a [`RuleViolation`] with the current file and line,
/// and reports it via the default [`TracingObserver`].
///
/// # Syntax
///
/// ```text
/// report_violation!(severity, kind, "message");
/// report_violation!(severity, kind, "message with {}", format_args);
/// ```
///
/// # Example
///
/// ```
/// use scorebook::{report_violation, telemetry::{ViolationSeverity, ViolationKind}};
///
/// let base = "second";
/// let displaced = "ana";
///
/// report_violation!(ViolationSeverity::Warning, ViolationKind::BaseOccupancy,
///     "runner placed on occupied {}: {} discarded", base, displaced);
/// ```
#[macro_export]
macro_rules! report_violation {
    // Basic: severity, kind, message (no format args)
    ($severity:expr, $kind:expr, $msg:literal) => {{
        use $crate::telemetry::ViolationObserver as _;
        let violation = $crate::telemetry::RuleViolation::new(
            $severity,
            $kind,
            $msg,
            concat!(file!(), ":", line!()),
        );
        // Log via tracing by default
        $crate::telemetry::TracingObserver.on_violation(&violation);
    }};

    // With format args: severity, kind, format, args...
    ($severity:expr, $kind:expr, $fmt:literal, $($arg:tt)+) => {{
        use $crate::telemetry::ViolationObserver as _;
        let violation = $crate::telemetry::RuleViolation::new(
            $severity,
            $kind,
            format!($fmt, $($arg)+),
            concat!(file!(), ":", line!()),
        );
        $crate::telemetry::TracingObserver.on_violation(&violation);
    }};
}

/// Asserts that no violations have been collected.
///
/// # Panics
///
/// Panics if the observer contains any violations, printing them for debugging.
///
/// # Example
///
/// ```
/// use scorebook::{assert_no_violations, telemetry::CollectingObserver};
///
/// let observer = CollectingObserver::new();
/// // ... run some operations ...
/// assert_no_violations!(observer);
/// ```
#[macro_export]
macro_rules! assert_no_violations {
    ($observer:expr) => {{
        let violations = $observer.violations();
        assert!(
            violations.is_empty(),
            "Expected no violations, but found {}:\n{:#?}",
            violations.len(),
            violations
        );
    }};

    ($observer:expr, $msg:expr) => {{
        let violations = $observer.violations();
        assert!(
            violations.is_empty(),
            "{}\nExpected no violations, but found {}:\n{:#?}",
            $msg,
            violations.len(),
            violations
        );
    }};
}

/// Asserts that a violation of the specified kind was collected.
///
/// # Panics
///
/// Panics if no violation of the specified kind was found.
///
/// # Example
///
/// ```
/// use scorebook::{assert_violation, telemetry::{CollectingObserver, ViolationKind, ViolationObserver, RuleViolation, ViolationSeverity}};
///
/// let observer = CollectingObserver::new();
/// observer.on_violation(&RuleViolation::new(
///     ViolationSeverity::Warning,
///     ViolationKind::BaseOccupancy,
///     "test",
///     "test.rs:1",
/// ));
/// assert_violation!(observer, ViolationKind::BaseOccupancy);
/// ```
#[macro_export]
macro_rules! assert_violation {
    ($observer:expr, $kind:expr) => {{
        assert!(
            $observer.has_violation($kind),
            "Expected violation of kind {:?}, but found: {:#?}",
            $kind,
            $observer.violations()
        );
    }};

    ($observer:expr, $kind:expr, $msg:expr) => {{
        assert!(
            $observer.has_violation($kind),
            "{}\nExpected violation of kind {:?}, but found: {:#?}",
            $msg,
            $kind,
            $observer.violations()
        );
    }};
}

/// Reports a violation to an optional observer, falling back to [`TracingObserver`] if `None`.
///
/// This function is used internally by sessions to report violations through their
/// configured observer, while keeping the default tracing-based logging when no
/// observer was installed.
///
/// # Example
///
/// ```
/// use scorebook::telemetry::{
///     report_to_observer, CollectingObserver, RuleViolation, ViolationKind, ViolationSeverity
/// };
/// use std::sync::Arc;
///
/// let observer = Arc::new(CollectingObserver::new());
/// let violation = RuleViolation::new(
///     ViolationSeverity::Warning,
///     ViolationKind::BaseOccupancy,
///     "test message",
///     "test.rs:1",
/// );
///
/// // Report to custom observer
/// report_to_observer(Some(&observer), &violation);
/// assert_eq!(observer.len(), 1);
///
/// // Report with no observer (uses TracingObserver)
/// report_to_observer(None::<&Arc<CollectingObserver>>, &violation);
/// ```
pub fn report_to_observer<O: ViolationObserver + ?Sized>(
    observer: Option<&Arc<O>>,
    violation: &RuleViolation,
) {
    match observer {
        Some(obs) => obs.on_violation(violation),
        None => TracingObserver.on_violation(violation),
    }
}

/// Macro for reporting rule violations through a session's observer.
///
/// This macro is similar to [`report_violation!`], but allows specifying an
/// optional observer. If the observer is `None`, it falls back to the default
/// [`TracingObserver`].
///
/// # Syntax
///
/// ```text
/// report_violation_to!(observer, severity, kind, "message");
/// report_violation_to!(observer, severity, kind, "message with {}", format_args);
/// ```
///
/// # Example
///
/// ```
/// use scorebook::{report_violation_to, telemetry::{ViolationSeverity, ViolationKind, CollectingObserver, ViolationObserver}};
/// use std::sync::Arc;
///
/// let observer: Option<Arc<dyn ViolationObserver>> = Some(Arc::new(CollectingObserver::new()));
///
/// report_violation_to!(&observer, ViolationSeverity::Warning, ViolationKind::BaseOccupancy,
///     "runner on {} discarded by placement", "second");
/// ```
#[macro_export]
macro_rules! report_violation_to {
    // Basic: observer, severity, kind, message (no format args)
    ($observer:expr, $severity:expr, $kind:expr, $msg:literal) => {{
        let violation = $crate::telemetry::RuleViolation::new(
            $severity,
            $kind,
            $msg,
            concat!(file!(), ":", line!()),
        );
        $crate::telemetry::report_to_observer($observer.as_ref(), &violation);
    }};

    // With format args: observer, severity, kind, format, args...
    ($observer:expr, $severity:expr, $kind:expr, $fmt:literal, $($arg:tt)+) => {{
        let violation = $crate::telemetry::RuleViolation::new(
            $severity,
            $kind,
            format!($fmt, $($arg)+),
            concat!(file!(), ":", line!()),
        );
        $crate::telemetry::report_to_observer($observer.as_ref(), &violation);
    }};
}

// ==========================================
// Runtime Invariant Checking
// ==========================================

/// Result of an invariant check.
///
/// Contains information about what invariant was violated and any
/// additional context for debugging.
///
/// # Serialization
///
/// This type implements `serde::Serialize` for structured JSON output.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InvariantViolation {
    /// Name of the type whose invariant was violated.
    pub type_name: &'static str,
    /// Description of the violated invariant.
    pub invariant: String,
    /// Additional diagnostic context.
    pub details: Option<String>,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    #[must_use]
    pub fn new(type_name: &'static str, invariant: impl Into<String>) -> Self {
        Self {
            type_name,
            invariant: invariant.into(),
            details: None,
        }
    }

    /// Adds additional details to the violation.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Serializes this violation to a JSON string.
    ///
    /// Returns `None` if serialization fails (which should not happen for
    /// well-formed violations).
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    /// Serializes this violation to a pretty-printed JSON string.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json_pretty(&self) -> Option<String> {
        serde_json::to_string_pretty(self).ok()
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.type_name, self.invariant)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

/// Trait for types that maintain internal invariants.
///
/// Types implementing this trait can have their invariants checked at runtime
/// during debug builds or when the `paranoid` feature is enabled.
///
/// # Example
///
/// ```
/// use scorebook::telemetry::{InvariantChecker, InvariantViolation};
///
/// struct BoundedCounter {
///     value: u32,
///     max: u32,
/// }
///
/// impl InvariantChecker for BoundedCounter {
///     fn check_invariants(&self) -> Result<(), InvariantViolation> {
///         if self.value > self.max {
///             return Err(InvariantViolation::new(
///                 "BoundedCounter",
///                 "value exceeds maximum",
///             ).with_details(format!("value={}, max={}", self.value, self.max)));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait InvariantChecker {
    /// Checks that all invariants of this type are satisfied.
    ///
    /// Returns `Ok(())` if all invariants hold, or an `InvariantViolation`
    /// describing the first broken invariant.
    fn check_invariants(&self) -> Result<(), InvariantViolation>;
}

/// Macro for conditionally checking invariants in debug builds.
///
/// This macro expands to an invariant check in debug builds but compiles
/// to nothing in release builds, unless the `paranoid` feature is enabled.
///
/// # Syntax
///
/// ```text
/// debug_check_invariants!(expr);
/// debug_check_invariants!(expr, "context message");
/// ```
///
/// # Example
///
/// ```ignore
/// use scorebook::{debug_check_invariants, telemetry::InvariantChecker};
///
/// fn process<T: InvariantChecker>(item: &T) {
///     // Check invariants at entry in debug builds
///     debug_check_invariants!(item, "before processing");
///
///     // ... do work ...
///
///     // Check invariants at exit in debug builds
///     debug_check_invariants!(item, "after processing");
/// }
/// ```
#[macro_export]
#[cfg(any(debug_assertions, feature = "paranoid"))]
macro_rules! debug_check_invariants {
    ($expr:expr) => {{
        use $crate::telemetry::InvariantChecker as _;
        if let Err(violation) = $expr.check_invariants() {
            $crate::report_violation!(
                $crate::telemetry::ViolationSeverity::Critical,
                $crate::telemetry::ViolationKind::Internal,
                "{}",
                violation
            );
        }
    }};

    ($expr:expr, $context:expr) => {{
        use $crate::telemetry::InvariantChecker as _;
        if let Err(violation) = $expr.check_invariants() {
            $crate::report_violation!(
                $crate::telemetry::ViolationSeverity::Critical,
                $crate::telemetry::ViolationKind::Internal,
                "{} [context: {}]",
                violation,
                $context
            );
        }
    }};
}

/// No-op version for release builds without `paranoid` feature.
#[macro_export]
#[cfg(not(any(debug_assertions, feature = "paranoid")))]
macro_rules! debug_check_invariants {
    ($expr:expr) => {{}};
    ($expr:expr, $context:expr) => {{}};
}

/// Macro for checking invariants and panicking if violated (debug only).
///
/// Unlike [`debug_check_invariants!`], this macro will panic if an invariant
/// is violated, making it suitable for critical invariants where continuing
/// would corrupt the scoring record.
///
/// # Example
///
/// ```ignore
/// use scorebook::{assert_invariants, telemetry::InvariantChecker};
///
/// fn critical_operation<T: InvariantChecker>(item: &mut T) {
///     assert_invariants!(item); // Panics if invariant broken
///     // ... proceed knowing invariants hold ...
/// }
/// ```
#[macro_export]
#[cfg(any(debug_assertions, feature = "paranoid"))]
macro_rules! assert_invariants {
    ($expr:expr) => {{
        use $crate::telemetry::InvariantChecker as _;
        if let Err(violation) = $expr.check_invariants() {
            panic!("Invariant violation: {}", violation);
        }
    }};

    ($expr:expr, $context:expr) => {{
        use $crate::telemetry::InvariantChecker as _;
        if let Err(violation) = $expr.check_invariants() {
            panic!("Invariant violation ({}): {}", $context, violation);
        }
    }};
}

/// No-op version for release builds without `paranoid` feature.
#[macro_export]
#[cfg(not(any(debug_assertions, feature = "paranoid")))]
macro_rules! assert_invariants {
    ($expr:expr) => {{}};
    ($expr:expr, $context:expr) => {{}};
}
