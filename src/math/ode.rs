//! Fixed-step classical RK4 for small ODE systems.
//!
//! State and derivative are plain `&[f64]` slices; the derivative callback
//! fills `dy` in place and must be side-effect free, since it is evaluated
//! four times per step.

/// Scratch buffers so repeated steps allocate nothing.
pub struct Rk4Workspace {
    k1: Vec<f64>,
    k2: Vec<f64>,
    k3: Vec<f64>,
    k4: Vec<f64>,
    ytmp: Vec<f64>,
}

impl Rk4Workspace {
    pub fn new(n: usize) -> Self {
        Self {
            k1: vec![0.0; n],
            k2: vec![0.0; n],
            k3: vec![0.0; n],
            k4: vec![0.0; n],
            ytmp: vec![0.0; n],
        }
    }

    fn resize(&mut self, n: usize) {
        if self.k1.len() != n {
            self.k1.resize(n, 0.0);
            self.k2.resize(n, 0.0);
            self.k3.resize(n, 0.0);
            self.k4.resize(n, 0.0);
            self.ytmp.resize(n, 0.0);
        }
    }
}

/// Advance `y` by one RK4 step of size `dt` using preallocated scratch.
pub fn rk4_step_ws<F>(y: &mut [f64], t: f64, dt: f64, ws: &mut Rk4Workspace, mut f: F)
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    let n = y.len();
    ws.resize(n);
    let (k1, k2, k3, k4, ytmp) = (&mut ws.k1, &mut ws.k2, &mut ws.k3, &mut ws.k4, &mut ws.ytmp);

    f(t, y, k1);

    for i in 0..n {
        ytmp[i] = y[i] + 0.5 * dt * k1[i];
    }
    f(t + 0.5 * dt, ytmp, k2);

    for i in 0..n {
        ytmp[i] = y[i] + 0.5 * dt * k2[i];
    }
    f(t + 0.5 * dt, ytmp, k3);

    for i in 0..n {
        ytmp[i] = y[i] + dt * k3[i];
    }
    f(t + dt, ytmp, k4);

    for i in 0..n {
        y[i] += (dt / 6.0) * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
}

/// Advance `y` by one RK4 step, allocating scratch locally.
pub fn rk4_step<F>(y: &mut [f64], t: f64, dt: f64, f: F)
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    let mut ws = Rk4Workspace::new(y.len());
    rk4_step_ws(y, t, dt, &mut ws, f);
}

/// Integrate over an explicit sampling grid: one RK4 step per grid interval,
/// one output state per grid point. The first output entry is `y0` verbatim
/// (no integration is performed at the first point). Grid spacing may be
/// non-uniform; the caller is responsible for a strictly increasing grid.
pub fn integrate_grid<F>(y0: &[f64], grid: &[f64], mut f: F) -> Vec<Vec<f64>>
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    let mut y = y0.to_vec();
    let mut out = Vec::with_capacity(grid.len());
    out.push(y.clone());

    let mut ws = Rk4Workspace::new(y.len());
    for w in grid.windows(2) {
        rk4_step_ws(&mut y, w[0], w[1] - w[0], &mut ws, &mut f);
        out.push(y.clone());
    }
    out
}
