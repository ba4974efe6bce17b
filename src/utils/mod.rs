pub mod file_operations;

pub use file_operations::{
    copy_file, descriptor_name, list_descriptor_names, matches_extension, write_index_file,
    BUFFER_SIZE, DESCRIPTOR_EXTENSION,
};
