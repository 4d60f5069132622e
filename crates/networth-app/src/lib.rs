// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod fields;
pub mod forms;
pub mod grid;
pub mod ids;
pub mod model;
pub mod state;
pub mod summary;
pub mod validation;

pub use fields::*;
pub use forms::*;
pub use grid::*;
pub use ids::*;
pub use model::*;
pub use state::*;
pub use summary::*;
