mod common;
mod rendering;
mod routing;
