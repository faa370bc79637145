//! Batch proximal-gradient descent: a gradient step on the smooth part of the
//! objective (loss and L2 penalty) followed by the proximal operator of the L1
//! or group penalty.
//!
//! A step that would raise the penalized objective, or make it non-finite, is
//! retried with half the step size. The guess therefore only ever moves to a
//! better finite point, and an exploding exponential link cannot poison it.
use super::Problem;
use crate::{design::Design, error::RegressionResult, fit::FitState, num::Float};
use ndarray::{Array1, Array2};

/// Iterate over proximal-gradient steps until the relative change of the
/// parameters falls within the tolerance or the iteration budget is spent.
pub struct ProxGradient<'p, 'a, F, X>
where
    F: Float,
    X: Design<F>,
{
    problem: &'p Problem<'a, F, X>,
    /// The current parameter guess.
    guess: FitState<F>,
    /// The linear predictor of the current guess
    z: Array2<F>,
    /// The penalized objective of the current guess
    objective: F,
    /// The number of iterations taken so far
    pub n_iter: usize,
    /// Set once a step is within tolerance, ending the iteration.
    done: bool,
}

/// Represents a step of the descent.
pub struct ProxStep<F>
where
    F: Float,
{
    /// The parameters after the step.
    pub guess: FitState<F>,
    /// The norm of the change in the parameters relative to the norm of the
    /// previous parameters.
    pub rel_change: F,
    /// The step size that was accepted, or zero if no halving of the learning
    /// rate decreased the objective and the guess was left in place.
    pub step_size: F,
}

impl<'p, 'a, F, X> ProxGradient<'p, 'a, F, X>
where
    F: Float,
    X: Design<F>,
{
    pub fn new(problem: &'p Problem<'a, F, X>, initial: FitState<F>) -> RegressionResult<Self> {
        let z = initial.linear_predictor(problem.x)?;
        let objective = problem.objective_at(&initial, z.view());
        Ok(Self {
            problem,
            guess: initial,
            z,
            objective,
            n_iter: 0,
            done: false,
        })
    }

    /// The proximal-gradient update of the current guess with step size lr.
    fn candidate(&self, grad_beta0: &Array1<F>, grad_beta: &Array2<F>, lr: F) -> FitState<F> {
        let p = self.problem;
        let mut next = self.guess.clone();
        next.beta0 = &self.guess.beta0 - &(grad_beta0 * lr);
        let beta = &self.guess.beta - &(grad_beta * lr);
        next.beta = p.penalty.prox(beta, lr * p.penalty.alpha() * p.lambda);
        next
    }

    fn step(&mut self) -> RegressionResult<ProxStep<F>> {
        let p = self.problem;
        let (grad_beta0, grad_beta) = p.family.gradient(p.x, p.y, self.z.view())?;
        let grad_beta = p.penalty.gradient(grad_beta, p.lambda, &self.guess.beta);

        let old = self.guess.params();
        let mut lr = p.options.learning_rate;
        let mut accepted = F::zero();
        for _ in 0..=p.options.max_step_halves {
            let next = self.candidate(&grad_beta0, &grad_beta, lr);
            let z = next.linear_predictor(p.x)?;
            let objective = p.objective_at(&next, z.view());
            // a non-finite current objective accepts any finite candidate
            if objective.is_finite() && !(objective > self.objective) {
                self.guess = next;
                self.z = z;
                self.objective = objective;
                accepted = lr;
                break;
            }
            lr *= F::lit(0.5);
        }
        if accepted == F::zero() {
            log::debug!(
                "no step of at most {} decreased the objective {}",
                p.options.learning_rate,
                self.objective
            );
        }

        self.n_iter += 1;
        self.guess.n_iter = self.n_iter;
        let rel_change = relative_change(&old, &self.guess.params());
        Ok(ProxStep {
            guess: self.guess.clone(),
            rel_change,
            step_size: accepted,
        })
    }
}

impl<'p, 'a, F, X> Iterator for ProxGradient<'p, 'a, F, X>
where
    F: Float,
    X: Design<F>,
{
    type Item = RegressionResult<ProxStep<F>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.n_iter >= self.problem.options.max_iter {
            return None;
        }
        let step = self.step();
        if let Ok(step) = &step {
            if step.rel_change <= self.problem.options.tol {
                self.done = true;
            }
        }
        Some(step)
    }
}

/// |new - old| / |old|. A change from zero counts as converged only if
/// nothing moved.
fn relative_change<F: Float>(old: &Array1<F>, new: &Array1<F>) -> F {
    let norm = |v: &Array1<F>| v.fold(F::zero(), |acc, &x| acc + x * x).sqrt();
    let delta = norm(&(new - old));
    if delta == F::zero() {
        return F::zero();
    }
    let scale = norm(old);
    if scale == F::zero() {
        F::infinity()
    } else {
        delta / scale
    }
}

/// Run the descent to completion and return the final parameters.
pub fn solve<F, X>(problem: &Problem<F, X>, init: FitState<F>) -> RegressionResult<FitState<F>>
where
    F: Float,
    X: Design<F>,
{
    let mut last = init;
    last.n_iter = 0;
    last.converged = false;
    for step in ProxGradient::new(problem, last.clone())? {
        let step = step?;
        last = step.guess;
        last.converged = step.rel_change <= problem.options.tol;
    }
    Ok(last)
}
