mod canvas;
mod controls;
mod labels;
