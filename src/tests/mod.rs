// src/tests/mod.rs
// Tests transverses du simulateur: équivalences entre organisations et propriétés sur traces générées
