pub mod htmx;
