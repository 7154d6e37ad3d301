pub(crate) mod frame;
