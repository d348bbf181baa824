use std::marker::PhantomData;

use glam::Vec3;
use rayon::prelude::*;

use super::{ForceBuffer, ForceCompute};
use crate::core::particles::ParticleData;
use crate::error::{Error, Result};
use crate::platform::record::{Scalar, Scalar4};

/// Evaluates a single-particle external potential from packed parameters.
pub trait Evaluator {
    /// Name the potential's energy is logged under.
    const NAME: &'static str;

    fn new(position: Vec3, box_lengths: Vec3, params: &Scalar4) -> Self;

    /// Force on the particle and its potential energy.
    fn evaluate(&self) -> (Vec3, Scalar);
}

/// An external potential applied to every particle, parametrized per type.
///
/// Without a block size every particle is evaluated in order on the calling
/// thread. The accelerated backend splits particles into blocks of
/// `block_size` and evaluates the blocks in parallel.
pub struct PotentialExternal<E> {
    params: Vec<Scalar4>,
    block_size: Option<usize>,
    out: ForceBuffer,
    _evaluator: PhantomData<fn() -> E>,
}

impl<E: Evaluator> PotentialExternal<E> {
    pub fn new(n_types: usize) -> Self {
        Self {
            params: vec![Scalar4::default(); n_types],
            block_size: None,
            out: ForceBuffer::default(),
            _evaluator: PhantomData,
        }
    }

    pub fn accelerated(n_types: usize, block_size: u32) -> Self {
        let mut potential = Self::new(n_types);
        potential.set_block_size(block_size);
        potential
    }

    pub fn set_block_size(&mut self, block_size: u32) {
        self.block_size = Some(block_size.max(1) as usize);
    }

    pub fn block_size(&self) -> Option<usize> {
        self.block_size
    }

    pub fn params(&self) -> &[Scalar4] {
        &self.params
    }

}

fn evaluate_one<E: Evaluator>(params: &[Scalar4], particles: &ParticleData, i: usize) -> (Vec3, Scalar) {
    let type_id = particles.type_ids()[i] as usize;
    E::new(particles.positions()[i], particles.box_lengths(), &params[type_id]).evaluate()
}

impl<E: Evaluator> ForceCompute for PotentialExternal<E> {
    fn kind(&self) -> &str {
        E::NAME
    }

    fn compute(&mut self, particles: &ParticleData) {
        let Self {
            params,
            block_size,
            out,
            ..
        } = self;
        let params: &[Scalar4] = params;
        out.reset(particles.len());

        match *block_size {
            None => {
                for (i, (force, energy)) in out.force.iter_mut().zip(&mut out.energy).enumerate() {
                    (*force, *energy) = evaluate_one::<E>(params, particles, i);
                }
            }
            Some(block) => {
                out.force
                    .par_chunks_mut(block)
                    .zip(out.energy.par_chunks_mut(block))
                    .enumerate()
                    .for_each(|(b, (forces, energies))| {
                        let start = b * block;
                        for (k, (force, energy)) in forces.iter_mut().zip(energies).enumerate() {
                            (*force, *energy) = evaluate_one::<E>(params, particles, start + k);
                        }
                    });
            }
        }
    }

    fn forces(&self) -> &ForceBuffer {
        &self.out
    }

    fn set_params(&mut self, type_index: usize, params: Scalar4) -> Result<()> {
        let count = self.params.len();
        let slot = self
            .params
            .get_mut(type_index)
            .ok_or(Error::TypeIndexOutOfRange {
                index: type_index,
                count,
            })?;
        *slot = params;
        Ok(())
    }
}
