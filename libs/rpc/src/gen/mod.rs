// @generated
// This file wires up buf-generated protobuf code
// Note: The prost files already include!() the tonic files automatically

pub mod todo {
    include!("todo.rs");
    // todo.tonic.rs is auto-included by todo.rs
}
