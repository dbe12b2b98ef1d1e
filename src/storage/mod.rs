//! Storage for downloaded documents.
//!
//! Every accepted document lives at `<download_dir>/<slug(term)>.pdf`. No
//! other state is written to disk.
//!
//! ## Directory Structure
//!
//! ```text
//! bibliografia_pdf/
//! ├── TANENBAUM,_Andrew_S._Redes_de_computadores.pdf
//! └── KUROSE,_James_F._Redes_de_Computadores_e_a_internet.pdf
//! ```

pub mod local;

pub use local::DownloadStore;
