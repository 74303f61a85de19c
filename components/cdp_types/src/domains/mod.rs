// CDP Domain type definitions
// Contains the parameter types of the events a HAR capture consumes

pub mod network;
pub mod page;
pub mod runtime;
