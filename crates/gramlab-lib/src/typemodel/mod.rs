//! AST type inference from grammar rule bodies.

pub mod infer;
pub mod types;


pub use infer::build;
pub use types::{
    Attribute, CallSite, InterfaceInfo, Primitive, PropertyType, ReturnType, RuleInfo, RuleKind,
    SuperTypeRef, TypeDescriptor, TypeModel, TypeSegment, UnionInfo,
};
