mod model;
mod reconcile;
mod scan;


pub(crate) use model::*;
pub(crate) use reconcile::*;
pub(crate) use scan::*;
