// UI module - Slint window wiring
//
// This module contains:
// - GuiController: Main controller that wires up the window with the cropping session

pub mod controller;

pub use controller::GuiController;
