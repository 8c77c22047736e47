pub mod roster_table;
