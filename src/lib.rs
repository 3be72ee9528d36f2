//! # combo-rs: boolean encoding of hierarchical decision variables
//!
//! **`combo-rs`** lowers a typed model of decision variables into a flat bit
//! space suitable for a SAT/optimization backend, and lifts a satisfying
//! assignment back into typed values.
//!
//! ## Variables
//!
//! - [`Root`][crate::variable::Root]: sentinel at the top of the hierarchy, takes no bits.
//! - [`Flag`][crate::variable::Flag]: one bit carrying a fixed payload when set.
//! - [`Select`][crate::select::Select]: a choice over an ordered domain, either
//!   [`Nominal`][crate::select::SelectKind::Nominal] (exactly one option) or
//!   [`Multiple`][crate::select::SelectKind::Multiple] (any non-empty subset).
//!
//! Variables are **optional** (they own an activation bit and may be absent)
//! or **mandatory** (active whenever their parent is). Nesting variables under
//! other variables or under single options builds the hierarchy.
//!
//! ## Basic Usage
//!
//! ```rust
//! use combo_rs::builder::Builder;
//! use combo_rs::instance::BitArray;
//! use combo_rs::select::Selection;
//! use combo_rs::variable::Variable;
//!
//! let mut builder = Builder::new("survey");
//! let root = builder.root().as_value();
//! let dark = builder.flag("dark", true, root).unwrap();
//! let size = builder.nominal("size", false, root, ["s", "m", "l"]).unwrap();
//! let model = builder.build();
//!
//! // Bit 0 is the flag, bits 1..4 are the options of `size`.
//! let instance = BitArray::from_bits(model.nbr_bits(), [0, 2]);
//! assert!(model.is_satisfied(&instance));
//! assert_eq!(model.value_of(&dark, &instance), Some(true));
//! assert_eq!(model.value_of(&size, &instance), Some(Selection::One("m")));
//! ```
//!
//! ## Core Components
//!
//! - **[`index`]**: the bit-range allocator.
//! - **[`literal`]**: the signed literal convention shared by encoding and decoding.
//! - **[`constraint`]**: the descriptors handed to a solving backend.
//! - **[`builder`]**: model assembly and decoding through a frozen [`Model`][crate::builder::Model].

pub mod builder;
pub mod constraint;
pub mod error;
pub mod index;
pub mod instance;
pub mod literal;
pub mod select;
pub mod value;
pub mod variable;
