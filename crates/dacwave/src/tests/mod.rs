mod code;
mod mode;
mod table;
