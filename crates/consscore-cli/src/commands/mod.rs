pub mod orthologs;
pub mod score;
