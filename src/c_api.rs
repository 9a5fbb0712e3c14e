//! C ABI for hosts that drive the simulation and render its bodies.
//!
//! Every function accepts a null simulation pointer and then does nothing.
//! Invalid parameters are reported through return values, never by unwinding.

use crate::{
    body::{BodyHandle, BodyView, InitialVelocity},
    config::{Area, GalaxyOptions, SimulationConfig, UniformFieldOptions},
    simulation::Simulation,
    vector::Vector2,
};

use log::warn;

/// Maps the C seed argument to a config seed. `0` asks for a system seed.
fn seed_from_c(seed: u64) -> Option<u64> {
    (seed != 0).then_some(seed)
}

/// Creates a simulation. Returns null if `gravity` or `density` is invalid.
/// A `seed` of `0` seeds spawning from the system instead of a fixed value.
#[unsafe(no_mangle)]
pub extern "C" fn Simulation_Create(gravity: f64, density: f64, seed: u64) -> *mut Simulation {
    let config = SimulationConfig {
        gravity,
        density,
        seed: seed_from_c(seed),
        ..SimulationConfig::default()
    };
    match Simulation::with_config(&config) {
        Ok(sim) => Box::into_raw(Box::new(sim)),
        Err(err) => {
            warn!("Simulation_Create: {err}");
            std::ptr::null_mut()
        }
    }
}

/// # Safety
/// `handle` must be null or come from [`Simulation_Create`] and not be used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Destroy(handle: *mut Simulation) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)) };
    }
}

/// Advances the simulation by `dt` and writes up to `removed_cap` removed body
/// handles into `removed`. Returns the total number of removed bodies.
///
/// # Safety
/// `handle` must be null or valid. `removed` must be null or point to at least
/// `removed_cap` writable handles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Step(
    handle: *mut Simulation,
    dt: f64,
    removed: *mut BodyHandle,
    removed_cap: usize,
) -> usize {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return 0;
    };

    let gone = sim.step(dt);
    if !removed.is_null() {
        let n = gone.len().min(removed_cap);
        unsafe { std::ptr::copy_nonoverlapping(gone.as_ptr(), removed, n) };
    }
    gone.len()
}

/// Adds a body with an explicit velocity. Returns its handle, or
/// `u64::MAX` if a parameter is invalid.
///
/// # Safety
/// `handle` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_AddBody(
    handle: *mut Simulation,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    mass: f64,
    density: f64,
    color: u32,
) -> u64 {
    let initial = InitialVelocity::Explicit(Vector2::new(vx, vy));
    unsafe { add_body(handle, Vector2::new(x, y), mass, density, color, initial) }
}

/// Adds a body moving in a random direction with the given kinetic energy.
/// Returns its handle, or `u64::MAX` if a parameter is invalid.
///
/// # Safety
/// `handle` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_AddBodyWithEnergy(
    handle: *mut Simulation,
    x: f64,
    y: f64,
    kinetic_energy: f64,
    mass: f64,
    density: f64,
    color: u32,
) -> u64 {
    let initial = InitialVelocity::FromKineticEnergy(kinetic_energy);
    unsafe { add_body(handle, Vector2::new(x, y), mass, density, color, initial) }
}

unsafe fn add_body(
    handle: *mut Simulation,
    pos: Vector2,
    mass: f64,
    density: f64,
    color: u32,
    initial: InitialVelocity,
) -> u64 {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return BodyHandle::DETACHED.0;
    };

    match sim.add_body(pos, mass, density, color, initial) {
        Ok(body) => body.0,
        Err(err) => {
            warn!("Simulation_AddBody: {err}");
            BodyHandle::DETACHED.0
        }
    }
}

/// Removes a body. Returns false if no body had that handle.
///
/// # Safety
/// `handle` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_RemoveBody(handle: *mut Simulation, body: u64) -> bool {
    unsafe { handle.as_mut() }.is_some_and(|sim| sim.remove_body(BodyHandle(body)).is_some())
}

/// Spawns a uniform random field. Returns the number of bodies added.
///
/// # Safety
/// `handle` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_SpawnUniformField(
    handle: *mut Simulation,
    count: usize,
    min_mass: f64,
    max_mass: f64,
    max_kinetic_energy: f64,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    bias_strength: f64,
) -> usize {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return 0;
    };

    let options = UniformFieldOptions {
        count,
        min_mass,
        max_mass,
        max_kinetic_energy,
        area: Area::new(x, y, width, height),
        bias_strength,
    };
    sim.spawn_uniform_field(&options).map_or_else(
        |err| {
            warn!("Simulation_SpawnUniformField: {err}");
            0
        },
        |handles| handles.len(),
    )
}

/// Spawns a galaxy disc. Returns the number of bodies added.
///
/// # Safety
/// `handle` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_SpawnGalaxy(
    handle: *mut Simulation,
    count: usize,
    min_mass: f64,
    max_mass: f64,
    center_x: f64,
    center_y: f64,
    radius: f64,
    speed: f64,
    temperature: f64,
) -> usize {
    let Some(sim) = (unsafe { handle.as_mut() }) else {
        return 0;
    };

    let options = GalaxyOptions {
        count,
        min_mass,
        max_mass,
        center: Vector2::new(center_x, center_y),
        radius,
        speed,
        temperature,
    };
    sim.spawn_galaxy(&options).map_or_else(
        |err| {
            warn!("Simulation_SpawnGalaxy: {err}");
            0
        },
        |handles| handles.len(),
    )
}

/// # Safety
/// `handle` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_GetBodyCount(handle: *const Simulation) -> usize {
    unsafe { handle.as_ref() }.map_or(0, Simulation::len)
}

/// Copies up to `cap` body snapshots into `out`. Returns the number written.
///
/// # Safety
/// `handle` must be null or valid. `out` must be null or point to at least
/// `cap` writable [`BodyView`]s.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_CopyBodies(
    handle: *const Simulation,
    out: *mut BodyView,
    cap: usize,
) -> usize {
    let Some(sim) = (unsafe { handle.as_ref() }) else {
        return 0;
    };
    if out.is_null() {
        return 0;
    }

    let mut written = 0;
    for view in sim.views().take(cap) {
        unsafe { out.add(written).write(view) };
        written += 1;
    }
    written
}

/// Writes the center of mass into `out_x` and `out_y`. Returns false, leaving
/// the outputs untouched, if there are no bodies.
///
/// # Safety
/// `handle` must be null or valid. `out_x` and `out_y` must be valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_CenterOfMass(
    handle: *const Simulation,
    out_x: *mut f64,
    out_y: *mut f64,
) -> bool {
    let Some(sim) = (unsafe { handle.as_ref() }) else {
        return false;
    };

    match sim.center_of_mass() {
        Ok(center) => {
            unsafe {
                out_x.write(center.x);
                out_y.write(center.y);
            }
            true
        }
        Err(_) => false,
    }
}

/// # Safety
/// `handle` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Simulation_Clear(handle: *mut Simulation) {
    if let Some(sim) = unsafe { handle.as_mut() } {
        sim.clear();
    }
}
