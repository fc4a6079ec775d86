//! The four reserved primitive operations.
//!
//! Recognised by declaration identity: `Environment::initialize` records which
//! top-level function declarations carry a reserved name, and calls to any
//! other declaration are ordinary user calls even if they share the name.

/// A reserved primitive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Builtin {
    /// `GET()`: read one integer from the input handler.
    Get,
    /// `PRINT(x)`: write `x` and a newline to the print handler.
    Print,
    /// `MALLOC(n)`: allocate `n` bytes, yield the base address.
    Malloc,
    /// `FREE(p)`: release the block based at `p`.
    Free,
}

impl Builtin {
    pub const ALL: [Builtin; 4] = [Builtin::Get, Builtin::Print, Builtin::Malloc, Builtin::Free];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "GET" => Some(Builtin::Get),
            "PRINT" => Some(Builtin::Print),
            "MALLOC" => Some(Builtin::Malloc),
            "FREE" => Some(Builtin::Free),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Builtin::Get => "GET",
            Builtin::Print => "PRINT",
            Builtin::Malloc => "MALLOC",
            Builtin::Free => "FREE",
        }
    }

    pub const fn arity(self) -> usize {
        match self {
            Builtin::Get => 0,
            Builtin::Print | Builtin::Malloc | Builtin::Free => 1,
        }
    }
}

/// Name of the program entry point.
pub const ENTRY_POINT: &str = "main";
