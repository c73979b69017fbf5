pub mod members;
pub mod out_of_office;
pub mod rota;
