//! Static type categories attached to every node and variable.
//!
//! The front end resolves types fully; the evaluator only needs the category
//! to size declarations and answer `sizeof` queries. Pointee and element
//! types are kept one level deep, which is all the memory model consults.

/// Machine word size in bytes.
///
/// The unit of heap alignment and of subscript spacing for every element
/// type.
pub const WORD_SIZE: i64 = 4;

/// Size in bytes reported for `char`.
pub const CHAR_SIZE: i64 = 1;

/// Element or pointee category.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scalar {
    Int,
    Char,
    Pointer,
}

impl Scalar {
    /// Widen to a full type. A nested pointer loses its own pointee.
    pub const fn to_ty(self) -> Ty {
        match self {
            Scalar::Int => Ty::Int,
            Scalar::Char => Ty::Char,
            Scalar::Pointer => Ty::Pointer(Scalar::Int),
        }
    }

    /// `sizeof` for this category.
    pub const fn size_of(self) -> i64 {
        match self {
            Scalar::Int | Scalar::Pointer => WORD_SIZE,
            Scalar::Char => CHAR_SIZE,
        }
    }
}

/// Resolved type category of a node or variable.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ty {
    /// Statements and functions without a value.
    Void,
    Int,
    Char,
    Pointer(Scalar),
    Array { elem: Scalar, len: u32 },
}

impl Ty {
    /// Answer to a `sizeof(T)` query.
    ///
    /// A fixed constant per category, not a real layout computation.
    pub const fn size_of(self) -> i64 {
        match self {
            Ty::Void => 0,
            Ty::Int | Ty::Pointer(_) => WORD_SIZE,
            Ty::Char => CHAR_SIZE,
            Ty::Array { elem, len } => elem.size_of().saturating_mul(len as i64),
        }
    }

    /// Element category of an array or pointee of a pointer.
    pub const fn element(self) -> Option<Scalar> {
        match self {
            Ty::Pointer(elem) | Ty::Array { elem, .. } => Some(elem),
            _ => None,
        }
    }

    pub const fn is_array(self) -> bool {
        matches!(self, Ty::Array { .. })
    }

    /// Whether values of this type are heap addresses.
    pub const fn is_address(self) -> bool {
        matches!(self, Ty::Pointer(_) | Ty::Array { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizeof_is_fixed_per_category() {
        assert_eq!(Ty::Int.size_of(), WORD_SIZE);
        assert_eq!(Ty::Char.size_of(), 1);
        assert_eq!(Ty::Pointer(Scalar::Char).size_of(), WORD_SIZE);
        assert_eq!(
            Ty::Array {
                elem: Scalar::Int,
                len: 4
            }
            .size_of(),
            16
        );
    }

    #[test]
    fn element_of_pointer_and_array() {
        assert_eq!(Ty::Pointer(Scalar::Char).element(), Some(Scalar::Char));
        assert_eq!(
            Ty::Array {
                elem: Scalar::Int,
                len: 2
            }
            .element(),
            Some(Scalar::Int)
        );
        assert_eq!(Ty::Int.element(), None);
        assert!(Ty::Pointer(Scalar::Int).is_address());
        assert!(!Ty::Char.is_address());
    }
}
