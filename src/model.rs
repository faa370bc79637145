//! Configure a model, fit it along a regularization path, and use the fitted
//! path for prediction, scoring and simulation.

use crate::{
    design::Design,
    error::{RegressionError, RegressionResult},
    family::Family,
    fit::{options::FitOptions, FitState},
    index::PathIndex,
    num::Float,
    path::{fit_path, validate_lambdas},
    regularization::ElasticNet,
    response::Response,
    score::{score, ScoreMethod},
    simulate::simulate,
    solver::Solver,
};
use ndarray::{s, Array1, ArrayD, ArrayView2, ArrayViewD, Axis, Ix1, Ix2, IxDyn};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A penalized generalized linear model and, once fit, its coefficients for
/// every penalty strength of the path.
#[derive(Clone, Debug)]
pub struct Model<F>
where
    F: Float,
{
    family: Family,
    solver: Solver,
    penalty: ElasticNet<F>,
    /// The penalty strengths, in the order they are fit
    reg_lambda: Array1<F>,
    options: FitOptions<F>,
    /// One entry per penalty strength, or empty before the first fit
    fit_: Vec<FitState<F>>,
    /// Selected with a single index, so predictions have no path axis
    single: bool,
}

impl<F> Model<F>
where
    F: Float,
{
    /// Fit the whole regularization path starting from zero coefficients,
    /// replacing any previous fit. The model is left untouched on error.
    pub fn fit<X>(&mut self, x: &X, y: &Response<F>) -> RegressionResult<&mut Self>
    where
        X: Design<F>,
    {
        self.fit_from(x, y, None)
    }

    /// Fit the path with the first entry starting from `init`.
    pub fn fit_warm<X>(
        &mut self,
        x: &X,
        y: &Response<F>,
        init: FitState<F>,
    ) -> RegressionResult<&mut Self>
    where
        X: Design<F>,
    {
        self.fit_from(x, y, Some(init))
    }

    fn fit_from<X>(
        &mut self,
        x: &X,
        y: &Response<F>,
        init: Option<FitState<F>>,
    ) -> RegressionResult<&mut Self>
    where
        X: Design<F>,
    {
        let path = fit_path(
            self.family,
            self.solver,
            &self.penalty,
            self.reg_lambda.view(),
            &self.options,
            x,
            y,
            init,
        )?;
        self.fit_ = path;
        self.single = false;
        Ok(self)
    }

    /// The expected response for each path entry and sample: shape
    /// `[n_path, n]`, or `[n_path, n, n_classes]` for the categorical family.
    /// A model selected with a single index drops the path axis.
    pub fn predict<X>(&self, x: &X) -> RegressionResult<ArrayD<F>>
    where
        X: Design<F>,
    {
        let states = self.fitted()?;
        let preds = states
            .iter()
            .map(|state| state.predict(self.family, x))
            .collect::<RegressionResult<Vec<_>>>()?;

        let mut shape = vec![preds.len(), x.n_samples()];
        if self.family.is_categorical() {
            shape.push(states[0].n_classes());
        }
        let flat: Vec<F> = preds.iter().flat_map(|p| p.iter().cloned()).collect();
        let stacked = ArrayD::from_shape_vec(IxDyn(&shape), flat)
            .map_err(|e| RegressionError::BadInput(e.to_string()))?;
        if self.single {
            Ok(stacked.index_axis_move(Axis(0), 0))
        } else {
            Ok(stacked)
        }
    }

    /// Fit, then predict on the same design matrix.
    pub fn fit_predict<X>(&mut self, x: &X, y: &Response<F>) -> RegressionResult<ArrayD<F>>
    where
        X: Design<F>,
    {
        self.fit(x, y)?.predict(x)
    }

    /// Score a prediction for one path entry: `yhat` (and `null`, if given)
    /// have one value per sample, or samples x classes for the categorical
    /// family. Deviance requires `null`; pseudo-R² uses the mean of `y` when
    /// it is absent.
    pub fn score(
        &self,
        y: &Response<F>,
        yhat: ArrayViewD<F>,
        null: Option<ArrayViewD<F>>,
        method: ScoreMethod,
    ) -> RegressionResult<F> {
        let yhat = as_matrix(yhat)?;
        let null = null.map(as_matrix).transpose()?;
        let n_classes = if self.family.is_categorical() {
            Some(yhat.ncols())
        } else {
            None
        };
        let y = y.to_matrix(self.family, n_classes)?;
        score(self.family, y.view(), yhat, null, method)
    }

    /// Draw a response for each row of `x` from the family's noise model.
    /// The generator is seeded with the configured random state, so repeated
    /// calls give the same draws.
    pub fn simulate<X>(&self, state: &FitState<F>, x: &X) -> RegressionResult<Response<F>>
    where
        X: Design<F>,
    {
        let mut rng = StdRng::seed_from_u64(self.options.random_state);
        self.simulate_with_rng(state, x, &mut rng)
    }

    pub fn simulate_with_rng<X, R>(
        &self,
        state: &FitState<F>,
        x: &X,
        rng: &mut R,
    ) -> RegressionResult<Response<F>>
    where
        X: Design<F>,
        R: Rng + ?Sized,
    {
        simulate(self.family, state, x, rng)
    }

    /// A copy of the model restricted to part of the fitted path. A single
    /// index gives a model that predicts without the path axis; a range gives
    /// the contiguous sub-path. Lists of indices are rejected.
    pub fn select<I: Into<PathIndex>>(&self, index: I) -> RegressionResult<Self> {
        let index = index.into();
        let states = self.fitted()?;
        let range = index.resolve(states.len())?;
        Ok(Self {
            reg_lambda: self.reg_lambda.slice(s![range.clone()]).to_owned(),
            fit_: states[range].to_vec(),
            single: index.is_single(),
            ..self.clone()
        })
    }

    fn fitted(&self) -> RegressionResult<&[FitState<F>]> {
        if self.fit_.is_empty() {
            Err(RegressionError::NotFit)
        } else {
            Ok(&self.fit_)
        }
    }

    pub fn is_fit(&self) -> bool {
        !self.fit_.is_empty()
    }

    /// The fitted coefficients, one entry per penalty strength.
    pub fn fit_states(&self) -> &[FitState<F>] {
        &self.fit_
    }

    pub fn reg_lambda(&self) -> &Array1<F> {
        &self.reg_lambda
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn solver(&self) -> Solver {
        self.solver
    }

    pub fn penalty(&self) -> &ElasticNet<F> {
        &self.penalty
    }

    pub fn options(&self) -> &FitOptions<F> {
        &self.options
    }
}

/// View a one- or two-dimensional prediction as samples x classes.
fn as_matrix<F>(a: ArrayViewD<'_, F>) -> RegressionResult<ArrayView2<'_, F>> {
    let res = match a.ndim() {
        1 => a
            .into_dimensionality::<Ix1>()
            .map(|v| v.insert_axis(Axis(1))),
        2 => a.into_dimensionality::<Ix2>(),
        n => {
            return Err(RegressionError::BadInput(format!(
                "predictions must have one or two dimensions, got {}",
                n
            )))
        }
    };
    res.map_err(|e| RegressionError::BadInput(e.to_string()))
}

/// Collects the configuration for a model and checks it in `build()`.
#[derive(Clone, Debug)]
pub struct ModelBuilder<F>
where
    F: Float,
{
    family: Family,
    alpha: F,
    reg_lambda: Array1<F>,
    group: Option<Array1<usize>>,
    solver: Solver,
    options: FitOptions<F>,
}

impl<F> ModelBuilder<F>
where
    F: Float,
{
    /// Start from the default configuration for the given family.
    pub fn new(family: Family) -> Self {
        Self {
            family,
            alpha: F::lit(0.5),
            reg_lambda: default_reg_lambda(),
            group: None,
            solver: Solver::default(),
            options: FitOptions::default(),
        }
    }

    /// Mixing weight between the L1 (1) and L2 (0) penalties
    pub fn alpha(mut self, alpha: F) -> Self {
        self.alpha = alpha;
        self
    }

    /// The penalty strengths of the path, fit in the given order
    pub fn reg_lambda<L: Into<Array1<F>>>(mut self, reg_lambda: L) -> Self {
        self.reg_lambda = reg_lambda.into();
        self
    }

    /// Group id for each feature; 0 leaves a feature ungrouped
    pub fn group(mut self, group: Array1<usize>) -> Self {
        self.group = Some(group);
        self
    }

    pub fn solver(mut self, solver: Solver) -> Self {
        self.solver = solver;
        self
    }

    pub fn learning_rate(mut self, learning_rate: F) -> Self {
        self.options.learning_rate = learning_rate;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.options.max_iter = max_iter;
        self
    }

    pub fn tol(mut self, tol: F) -> Self {
        self.options.tol = tol;
        self
    }

    pub fn max_step_halves(mut self, max_step_halves: usize) -> Self {
        self.options.max_step_halves = max_step_halves;
        self
    }

    pub fn random_state(mut self, random_state: u64) -> Self {
        self.options.random_state = random_state;
        self
    }

    pub fn build(self) -> RegressionResult<Model<F>> {
        validate_lambdas(self.reg_lambda.view())?;
        self.options.validate()?;
        let penalty = ElasticNet::new(self.alpha)?;
        let penalty = match self.group {
            Some(group) => penalty.with_groups(group),
            None => penalty,
        };
        Ok(Model {
            family: self.family,
            solver: self.solver,
            penalty,
            reg_lambda: self.reg_lambda,
            options: self.options,
            fit_: Vec::new(),
            single: false,
        })
    }
}

/// Ten strengths spaced evenly in log scale from 0.5 down to 0.01.
fn default_reg_lambda<F: Float>() -> Array1<F> {
    let ten = F::lit(10.);
    Array1::logspace(ten, F::lit(0.5).log10(), F::lit(0.01).log10(), 10)
}
