//! Conversions into the simulator's working units (ft, slug, ft/s).

const SLUGS_PER_LB: f64 = 0.031_081;
const SLUGS_PER_KG: f64 = 0.068_521_77;
const CM_PER_IN: f64 = 2.54;
const IN_PER_FT: f64 = 12.0;
const FPS_PER_MPH: f64 = 1.466_667;

pub fn lb_to_slugs(lb: f64) -> f64 {
    lb * SLUGS_PER_LB
}

pub fn kg_to_slugs(kg: f64) -> f64 {
    kg * SLUGS_PER_KG
}

pub fn inches_to_feet(inches: f64) -> f64 {
    inches / IN_PER_FT
}

pub fn cm_to_feet(cm: f64) -> f64 {
    inches_to_feet(cm / CM_PER_IN)
}

pub fn mph_to_fps(mph: f64) -> f64 {
    mph * FPS_PER_MPH
}
