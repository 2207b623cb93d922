/*!
Forecasting networks, as interchangeable strategies over the same scaled input tensors
*/
use serde::{Deserialize, Serialize};
use tch::nn::{self, Linear, Module, RNNConfig, Sequential, VarStore, GRU, LSTM, RNN};
use tch::{Reduction, Tensor};

/// The kind of network a forecaster uses
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    /// Long short-term memory layers followed by a linear read-out of the last step
    Lstm,
    /// Gated recurrent unit layers followed by a linear read-out of the last step
    Gru,
    /// A fully connected network over the flattened lookback window
    Mlp,
}

/// A descriptor for a forecaster
#[derive(Debug, Clone, PartialEq)]
pub struct ForecasterDesc {
    /// The kind of network
    pub architecture: Architecture,
    /// The number of features per time step
    pub inputs: usize,
    /// The number of time steps per input sequence
    pub lookback: usize,
    /// The size of the hidden layers
    pub hidden: usize,
    /// The number of recurrent layers (ignored by the MLP)
    pub layers: usize,
    /// Dropout between recurrent layers
    pub dropout: f64,
}

#[derive(Debug)]
enum Body {
    Lstm(LSTM),
    Gru(GRU),
    Mlp(Sequential),
}

/// A network mapping `[batch, lookback, inputs]` sequences to `[batch, 1]` predictions of the scaled target
#[derive(Debug)]
pub struct Forecaster {
    body: Body,
    head: Option<Linear>,
}

impl ForecasterDesc {
    /// Build a `Forecaster` over a given `VarStore`
    pub fn build(&self, vs: &VarStore) -> Forecaster {
        let config = RNNConfig {
            has_biases: true,
            num_layers: self.layers as i64,
            dropout: if self.layers > 1 { self.dropout } else { 0. },
            train: true,
            bidirectional: false,
            batch_first: true,
        };
        let root = vs.root();
        let head = || nn::linear(&root / "head", self.hidden as i64, 1, Default::default());
        match self.architecture {
            Architecture::Lstm => Forecaster {
                body: Body::Lstm(nn::lstm(&root / "lstm", self.inputs as i64, self.hidden as i64, config)),
                head: Some(head()),
            },
            Architecture::Gru => Forecaster {
                body: Body::Gru(nn::gru(&root / "gru", self.inputs as i64, self.hidden as i64, config)),
                head: Some(head()),
            },
            Architecture::Mlp => {
                let flat = (self.inputs * self.lookback) as i64;
                let mlp = nn::seq()
                    .add(nn::linear(&root / "fc1", flat, self.hidden as i64, Default::default()))
                    .add_fn(|xs| xs.relu())
                    .add(nn::linear(&root / "fc2", self.hidden as i64, 1, Default::default()));
                Forecaster {
                    body: Body::Mlp(mlp),
                    head: None,
                }
            }
        }
    }
}

impl Forecaster {
    /// Predict the scaled target for a batch of sequences
    pub fn forward(&self, xs: &Tensor) -> Tensor {
        let last = match &self.body {
            Body::Lstm(lstm) => lstm.seq(xs).0.select(1, -1),
            Body::Gru(gru) => gru.seq(xs).0.select(1, -1),
            Body::Mlp(mlp) => return mlp.forward(&xs.flatten(1, -1)),
        };
        match &self.head {
            Some(head) => head.forward(&last),
            None => last,
        }
    }
    /// The mean squared error of this forecaster's predictions
    pub fn loss(&self, xs: &Tensor, ys: &Tensor) -> Tensor {
        self.forward(xs).mse_loss(ys, Reduction::Mean)
    }
}
