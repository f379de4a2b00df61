use std::fmt;

// ---------------------------------------------------------------------------
// DeviceSchema – the column signature of one instrument's export
// ---------------------------------------------------------------------------

/// An instrument, identified by the exact ordered header row it writes.
#[derive(Debug, PartialEq, Eq)]
pub struct DeviceSchema {
    pub name: &'static str,
    pub column_headers: &'static [&'static str],
}

impl DeviceSchema {
    /// Exact, order- and length-sensitive header comparison. No trimming and
    /// no case folding: instrument exports never vary here.
    pub fn matches<S: AsRef<str>>(&self, headers: &[S]) -> bool {
        headers.len() == self.column_headers.len()
            && headers
                .iter()
                .zip(self.column_headers)
                .all(|(h, expected)| h.as_ref() == *expected)
    }
}

impl fmt::Display for DeviceSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

include!("headers.rs");

pub static VECTOR: DeviceSchema = DeviceSchema {
    name: "Vector",
    column_headers: &VECTOR_HEADERS,
};

pub static E7_30: DeviceSchema = DeviceSchema {
    name: "E7-30",
    column_headers: &E7_30_HEADERS,
};

/// Every supported instrument, in detection priority order. Supporting a new
/// instrument means adding its header row to `headers.rs` and its schema here.
pub static REGISTRY: &[&DeviceSchema] = &[&VECTOR, &E7_30];

/// The first registered schema whose headers equal `headers` exactly.
pub fn detect<S: AsRef<str>>(headers: &[S]) -> Option<&'static DeviceSchema> {
    REGISTRY.iter().copied().find(|schema| schema.matches(headers))
}

/// Look an instrument up by its display name.
pub fn by_name(name: &str) -> Option<&'static DeviceSchema> {
    REGISTRY.iter().copied().find(|schema| schema.name == name)
}
