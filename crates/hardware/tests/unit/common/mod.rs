//! Tests for pin identifiers, register layout, and configuration loading.
