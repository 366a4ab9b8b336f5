//! Observability events for gameshelf
//!
//! Every occurrence worth a log line has a variant here, including the
//! recovery paths (index reset, stale entry, rebuild) that never surface as
//! errors to the caller.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Catalog opened and ready
    CatalogOpened,

    // Index lifecycle
    /// Index file read successfully
    IndexLoaded,
    /// No index file present
    IndexMissing,
    /// Index file discarded as unreadable
    IndexReset,
    /// Index reconstructed from the store
    IndexRebuilt,
    /// Index position disagreed with the store
    IndexStaleEntry,

    // Record operations
    /// Record appended and indexed
    RecordInserted,
    /// Record removed
    RecordDeleted,
    /// Insert refused for an existing key
    RecordDuplicate,
    /// Record left out of a rebuild because it has no usable key
    RecordSkipped,
    /// Cover image stored
    CoverSaved,

    // Bulk operations
    /// Store replaced from an import file
    ImportComplete,
    /// Store written to an export file
    ExportComplete,
}

impl Event {
    /// Returns the event name as logged
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CatalogOpened => "CATALOG_OPENED",

            Event::IndexLoaded => "INDEX_LOADED",
            Event::IndexMissing => "INDEX_MISSING",
            Event::IndexReset => "INDEX_RESET",
            Event::IndexRebuilt => "INDEX_REBUILT",
            Event::IndexStaleEntry => "INDEX_STALE_ENTRY",

            Event::RecordInserted => "RECORD_INSERTED",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::RecordDuplicate => "RECORD_DUPLICATE",
            Event::RecordSkipped => "RECORD_SKIPPED",
            Event::CoverSaved => "COVER_SAVED",

            Event::ImportComplete => "IMPORT_COMPLETE",
            Event::ExportComplete => "EXPORT_COMPLETE",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::IndexReset
            | Event::IndexStaleEntry
            | Event::RecordDuplicate
            | Event::RecordSkipped => Severity::Warn,
            Event::RecordInserted | Event::RecordDeleted | Event::CoverSaved => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
