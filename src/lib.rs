/*!
# QueryChat Core

The parsing and data-shaping core of a chat-driven analytics client, built in Rust.

## Overview

A chat analytics assistant asks a backend to turn a natural-language question
into SQL, runs it, and returns a reply mixing prose, the executed query, and
the result rows. This crate implements the reusable logic behind every such
rendering surface: splitting the reply into narrative and SQL,
syntax-highlighting the SQL, and shaping arbitrary JSON row sets into
searchable, sortable, pageable, exportable tables.

Everything here is a pure, synchronous function over in-memory values. There
is no I/O, no shared mutable state, and no error taxonomy of its own: absent
SQL becomes an empty query, mixed-type sort keys fall back to string
comparison, and out-of-range pages come back empty. The surrounding
application (HTTP calls, layout, charting) stays outside this crate.

## Architecture

The data flows through three independent leaf components:

- **Reply parsing** - raw reply text becomes `{narrative, query}` via a
  layered strategy: fenced code block, explicit "Executed query" marker,
  heuristic SQL-start detection, then a plain-narrative fallback
- **SQL highlighting** - query text is tokenized into classified spans and
  rendered as an HTML fragment; concatenating token texts always
  reconstructs the input exactly
- **Table shaping** - JSON rows are flattened into dot-path columns with a
  stable `original_index`, then filtered, sorted, paginated, and exported
  as CSV

A thin state layer tracks what the caller owns between renders: search text,
the sort cycle, the page position, and the selection keyed by
`original_index` so it survives filtering and sorting.

## Modules

- **reply**: Narrative/SQL extraction from assistant replies
- **highlight**: SQL tokenizer and HTML renderer
- **table**: Flatten, filter, sort, paginate, CSV export, payload decoding
- **state**: Caller-side table view state (search, sort cycle, page, selection)
- **format**: Compact K/M/B/T number formatting for KPI and cell display

## Key Features

- Total functions: every operation degrades instead of failing
- Byte-exact round-trip guarantee for the SQL tokenizer
- Stable identity (`original_index`) for selection and export across
  filtering and sorting
- RFC 4180-style CSV quoting with `\n` line endings and no trailing newline
- Tolerant payload decoding (array, object, or JSON-in-string row data)
*/

// Re-export all modules so they appear in the documentation
pub mod format;
pub mod highlight;
pub mod reply;
pub mod state;
pub mod table;

/// Re-export everything from these modules to make it easier to use
pub use format::*;
pub use highlight::*;
pub use reply::*;
pub use state::*;
pub use table::*;
