pub mod diagnostics;
pub mod layout;
pub mod shared;
pub mod video;
pub mod vocabulary;

#[cfg(test)]
pub(crate) mod test_support;
